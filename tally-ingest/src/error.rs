use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, IngestError>;

/// Failures reading a statement file. Bad cell contents are never errors.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("opening {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("reading CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl IngestError {
    /// True when the file simply does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            IngestError::Open { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            IngestError::Csv(err) => match err.kind() {
                csv::ErrorKind::Io(io) => io.kind() == std::io::ErrorKind::NotFound,
                _ => false,
            },
        }
    }
}
