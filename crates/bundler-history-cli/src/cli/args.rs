use bundler_history_core::config::ResultsVersion;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bundler-history",
    about = "Pivot bundler test history into per-bundler CSV tables and flag flipping tests"
)]
pub struct Cli {
    /// Version of the test results (06 or 07)
    #[arg(short = 'v', long = "version", default_value = "07", value_parser = parse_version)]
    pub results_version: ResultsVersion,

    /// Base URL of the published results (ignored when --input is given)
    #[arg(
        long,
        env = "BUNDLER_HISTORY_URL",
        default_value = bundler_history_core::config::DEFAULT_BASE_URL
    )]
    pub base_url: String,

    /// Read the history document from a local file instead of fetching it.
    /// Takes precedence over --base-url
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Directory the <bundler>.csv files are written to
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Log filter (e.g. warn, info, bundler_history_core=debug)
    #[arg(long, env = "BUNDLER_HISTORY_LOG", default_value = "warn")]
    pub log_level: String,

    /// Do not print the flip summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

fn parse_version(s: &str) -> Result<ResultsVersion, String> {
    s.parse()
}
