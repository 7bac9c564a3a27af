use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Conditions that abort a scan before any report is produced.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The root path is missing or is not a directory.
    #[error("{}", path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The root exists but its entries cannot be listed.
    #[error("{}: cannot read directory", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("scan cancelled")]
    Cancelled,
}

/// Recoverable problems. The affected entry contributes zero bytes.
#[derive(Debug, Error)]
pub enum ScanIssue {
    // walkdir errors already name the path
    #[error("cannot read directory: {error}")]
    SubdirUnreadable { path: PathBuf, error: walkdir::Error },
    #[error("cannot stat entry: {error}")]
    EntryStatFailure { path: PathBuf, error: walkdir::Error },
}

impl ScanIssue {
    pub fn path(&self) -> &Path {
        match self {
            ScanIssue::SubdirUnreadable { path, .. } | ScanIssue::EntryStatFailure { path, .. } => {
                path
            }
        }
    }
}
