use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::de::{Error as _, IgnoredAny};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Raw history document: timestamp token -> component name -> run.
///
/// Insertion order of both levels is preserved; it decides row order in the
/// pivoted tables.
pub type HistoryDocument = IndexMap<String, IndexMap<String, RawComponentRun>>;

/// One component's run at one timestamp.
///
/// Never fails to deserialize: anything that is not an object with a
/// `testcase` map reads as a run without test cases.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawComponentRun {
    pub testcase: IndexMap<String, RawTestCase>,
}

impl<'de> Deserialize<'de> for RawComponentRun {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Run {
            #[serde(default, deserialize_with = "lenient_cases")]
            testcase: IndexMap<String, RawTestCase>,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Run(Run),
            Other(IgnoredAny),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Run(run) => Self {
                testcase: run.testcase,
            },
            Shape::Other(_) => Self::default(),
        })
    }
}

fn lenient_cases<'de, D>(deserializer: D) -> Result<IndexMap<String, RawTestCase>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Cases {
        Map(IndexMap<String, RawTestCase>),
        Other(IgnoredAny),
    }

    Ok(match Cases::deserialize(deserializer)? {
        Cases::Map(map) => map,
        Cases::Other(_) => IndexMap::new(),
    })
}

/// A single test-case record.
///
/// A record that is not a JSON object is kept as `malformed` and always
/// counts as a failure.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawTestCase {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Value>,
    #[serde(skip)]
    pub malformed: bool,
}

impl<'de> Deserialize<'de> for RawTestCase {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Record {
            #[serde(default)]
            name: Option<Value>,
            #[serde(default)]
            error: Option<Value>,
            #[serde(default)]
            failure: Option<Value>,
        }

        let raw = Value::deserialize(deserializer)?;
        if !raw.is_object() {
            return Ok(Self {
                malformed: true,
                ..Self::default()
            });
        }
        let record: Record = serde_json::from_value(raw).map_err(D::Error::custom)?;
        Ok(Self {
            name: record.name,
            error: record.error,
            failure: record.failure,
            malformed: false,
        })
    }
}

impl RawTestCase {
    /// Canonical test name, falling back to the record key when `name` is
    /// missing or not a string. Rows are never keyed by a placeholder name.
    pub fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.name.as_ref().and_then(Value::as_str).unwrap_or(key)
    }

    pub fn outcome(&self) -> Outcome {
        if self.malformed
            || is_marker_set(self.error.as_ref())
            || is_marker_set(self.failure.as_ref())
        {
            Outcome::Failure
        } else {
            Outcome::Success
        }
    }
}

// null, false, 0 and "" do not count as a recorded error/failure.
fn is_marker_set(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Success
    }

    /// Cell text in the written table.
    pub fn as_cell(self) -> &'static str {
        match self {
            Outcome::Success => "true",
            Outcome::Failure => "false",
        }
    }
}

/// Per-row consistency marker.
///
/// An unflagged row renders as a blank cell, not `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipFlag {
    Flagged,
    Blank,
}

impl FlipFlag {
    pub fn from_outcomes(outcomes: &[Outcome]) -> Self {
        let all_success = outcomes.iter().all(|o| o.is_success());
        let all_failure = outcomes.iter().all(|o| !o.is_success());
        if !all_success && !all_failure {
            FlipFlag::Flagged
        } else {
            FlipFlag::Blank
        }
    }

    pub fn is_flagged(self) -> bool {
        self == FlipFlag::Flagged
    }

    pub fn as_cell(self) -> &'static str {
        match self {
            FlipFlag::Flagged => "true",
            FlipFlag::Blank => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotColumn {
    /// Raw token as it appeared in the document.
    pub token: String,
    pub at: NaiveDateTime,
    /// Formatted header text.
    pub header: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotRow {
    pub test_name: String,
    pub flag: FlipFlag,
    /// One outcome per column, same order as `PivotTable::columns`.
    pub cells: Vec<Outcome>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PivotTable {
    pub component: String,
    pub columns: Vec<PivotColumn>,
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    pub fn row(&self, test_name: &str) -> Option<&PivotRow> {
        self.rows.iter().find(|r| r.test_name == test_name)
    }

    pub fn flipped(&self) -> impl Iterator<Item = &PivotRow> {
        self.rows.iter().filter(|r| r.flag.is_flagged())
    }
}
