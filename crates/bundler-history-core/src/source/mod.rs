use crate::errors::HistoryResult;
use crate::model::HistoryDocument;
use async_trait::async_trait;

/// Anything that can produce a history document.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch(&self) -> HistoryResult<HistoryDocument>;
    /// Human-readable origin, used in logs.
    fn describe(&self) -> String;
}

pub mod file;
pub mod http;

pub use file::FileHistorySource;
pub use http::HttpHistorySource;
