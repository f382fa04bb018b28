//! Error types for esg-ledger

use thiserror::Error;

use crate::store::Collection;

#[derive(Error, Debug)]
pub enum EsgError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Failed to persist {collection}: {source}")]
    Persistence {
        collection: Collection,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open data directory {}: {source}", .path.display())]
    DataDir {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl EsgError {
    pub fn company_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Company",
            id: id.to_string(),
        }
    }

    pub fn report_not_found(id: &str) -> Self {
        Self::NotFound {
            kind: "Report",
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EsgError>;
