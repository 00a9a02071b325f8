pub mod console;
pub mod csv;

pub use self::csv::{CsvDirSink, TableSink};
