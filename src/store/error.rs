use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read snapshot {path}: {source}")]
    SnapshotRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    SnapshotParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write snapshot {path}: {source}")]
    SnapshotWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
