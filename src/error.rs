use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Release catalog for {repo} unavailable: {reason}")]
    CatalogUnavailable { repo: String, reason: String },

    #[error("No usable releases found for {repo}")]
    EmptyCatalog { repo: String },

    #[error("Could not parse version record at {}", path.display())]
    InvalidRecord {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SyncError {
    pub fn unavailable(repo: &str, reason: impl ToString) -> Self {
        SyncError::CatalogUnavailable {
            repo: repo.to_string(),
            reason: reason.to_string(),
        }
    }
}
