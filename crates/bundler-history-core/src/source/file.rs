use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::info;

use super::HistorySource;
use crate::errors::{HistoryError, HistoryResult};
use crate::model::HistoryDocument;

/// Reads a previously downloaded history document from disk.
#[derive(Debug, Clone)]
pub struct FileHistorySource {
    path: PathBuf,
}

impl FileHistorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistorySource for FileHistorySource {
    async fn fetch(&self) -> HistoryResult<HistoryDocument> {
        let raw = tokio::fs::read(&self.path)
            .await
            .map_err(|e| HistoryError::io(&self.path, e))?;
        let doc: HistoryDocument = serde_json::from_slice(&raw).map_err(|e| HistoryError::Parse {
            message: format!("{} is not a history document: {}", self.path.display(), e),
        })?;

        info!(path = %self.path.display(), snapshots = doc.len(), "loaded history");
        Ok(doc)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
