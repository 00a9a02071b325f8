pub mod config;
pub mod errors;
pub mod model;
pub mod pivot;
pub mod report;
pub mod source;
pub mod timestamp;

pub use errors::{HistoryError, HistoryResult};
pub use model::{FlipFlag, HistoryDocument, Outcome, PivotColumn, PivotRow, PivotTable};
pub use pivot::pivot;
