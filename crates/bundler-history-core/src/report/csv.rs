use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{HistoryError, HistoryResult};
use crate::model::PivotTable;

pub const FLAG_HEADER: &str = "OH NO!";
pub const NAME_HEADER: &str = "Test Name";

/// Destination for pivoted tables.
pub trait TableSink {
    /// Persist one table, returning where it went.
    fn write_table(&mut self, table: &PivotTable) -> HistoryResult<PathBuf>;
}

/// Writes `<component>.csv` files into a directory.
#[derive(Debug, Clone)]
pub struct CsvDirSink {
    out_dir: PathBuf,
}

impl CsvDirSink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    pub fn path_for(&self, component: &str) -> PathBuf {
        self.out_dir.join(format!("{}.csv", file_stem(component)))
    }
}

impl TableSink for CsvDirSink {
    fn write_table(&mut self, table: &PivotTable) -> HistoryResult<PathBuf> {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| HistoryError::io(&self.out_dir, e))?;
        let path = self.path_for(&table.component);
        write_csv(table, &path)?;
        Ok(path)
    }
}

pub fn write_csv(table: &PivotTable, out: &Path) -> HistoryResult<()> {
    let content = render_csv(table);
    std::fs::write(out, content).map_err(|e| HistoryError::io(out, e))?;
    debug!(path = %out.display(), rows = table.rows.len(), "wrote table");
    Ok(())
}

pub fn render_csv(table: &PivotTable) -> String {
    let mut csv = String::new();

    let mut header = vec![FLAG_HEADER, NAME_HEADER];
    header.extend(table.columns.iter().map(|c| c.header.as_str()));
    push_record(&mut csv, header);

    for row in &table.rows {
        let mut record = vec![row.flag.as_cell(), row.test_name.as_str()];
        record.extend(row.cells.iter().map(|o| o.as_cell()));
        push_record(&mut csv, record);
    }

    csv
}

fn push_record<'a>(csv: &mut String, fields: impl IntoIterator<Item = &'a str>) {
    let line: Vec<String> = fields.into_iter().map(escape).collect();
    csv.push_str(&line.join(","));
    csv.push('\n');
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// Component names come from remote data; keep them inside out_dir.
fn file_stem(component: &str) -> String {
    let stem: String = component
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    match stem.as_str() {
        "" | "." | ".." => format!("_{}", stem),
        _ => stem,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FlipFlag, Outcome, PivotColumn, PivotRow};
    use crate::timestamp;

    fn column(token: &str) -> PivotColumn {
        let at = timestamp::decode(token).unwrap();
        PivotColumn {
            token: token.into(),
            header: timestamp::format(&at),
            at,
        }
    }

    fn sample() -> PivotTable {
        PivotTable {
            component: "voltaire".into(),
            columns: vec![column("20240101_000000"), column("20240102_000000")],
            rows: vec![
                PivotRow {
                    test_name: "test_stable".into(),
                    flag: FlipFlag::Blank,
                    cells: vec![Outcome::Success, Outcome::Success],
                },
                PivotRow {
                    test_name: "test_flaky[a, \"b\"]".into(),
                    flag: FlipFlag::Flagged,
                    cells: vec![Outcome::Success, Outcome::Failure],
                },
            ],
        }
    }

    #[test]
    fn test_csv_output_structure() {
        let content = render_csv(&sample());
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(
            lines[0],
            "OH NO!,Test Name,2024-01-01T00:00:00.000Z,2024-01-02T00:00:00.000Z"
        );
        // Unflagged rows render a blank flag, not `false`
        assert_eq!(lines[1], ",test_stable,true,true");
        assert_eq!(lines[2], "true,\"test_flaky[a, \"\"b\"\"]\",true,false");
        assert_eq!(lines.len(), 3);
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_empty_table_is_header_only() {
        let table = PivotTable {
            component: "empty".into(),
            columns: vec![],
            rows: vec![],
        };
        assert_eq!(render_csv(&table), "OH NO!,Test Name\n");
    }

    #[test]
    fn test_sink_writes_component_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let out_dir = temp_dir.path().join("nested");
        let mut sink = CsvDirSink::new(&out_dir);

        let path = sink.write_table(&sample()).unwrap();
        assert_eq!(path, out_dir.join("voltaire.csv"));

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("OH NO!,Test Name,"));
    }

    #[test]
    fn test_file_stem_stays_in_dir() {
        let sink = CsvDirSink::new("out");
        assert_eq!(sink.path_for("a/b"), Path::new("out").join("a_b.csv"));
        assert_eq!(sink.path_for("..\\x"), Path::new("out").join(".._x.csv"));
        assert_eq!(sink.path_for(".."), Path::new("out").join("_...csv"));
    }
}
