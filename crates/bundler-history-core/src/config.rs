use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "https://bundler-test-results.erc4337.io";

/// Published result sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsVersion {
    V06,
    #[default]
    V07,
}

impl ResultsVersion {
    pub const ALL: [ResultsVersion; 2] = [ResultsVersion::V06, ResultsVersion::V07];

    pub fn as_str(self) -> &'static str {
        match self {
            ResultsVersion::V06 => "06",
            ResultsVersion::V07 => "07",
        }
    }
}

impl fmt::Display for ResultsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResultsVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| format!("unsupported results version '{}' (expected 06 or 07)", s))
    }
}

/// Where the history document lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    pub base_url: String,
    pub version: ResultsVersion,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            version: ResultsVersion::default(),
        }
    }
}

impl SourceConfig {
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_version(mut self, version: ResultsVersion) -> Self {
        self.version = version;
        self
    }

    pub fn history_url(&self) -> String {
        format!(
            "{}/v{}/history/history.json",
            self.base_url.trim_end_matches('/'),
            self.version
        )
    }
}
