use std::io;
use std::path::PathBuf;

/// Errors produced by the store, the loaders and the filter constructors.
///
/// Filter errors are fatal to the current call; store errors leave the store
/// in its pre-call state.
#[derive(Debug, thiserror::Error)]
pub enum FastaError {
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },
    #[error("read error on {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("write error on {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("bad format: {0}")]
    BadFormat(String),
    #[error("out of range: {0}")]
    OutOfRange(String),
    #[error("degenerate composition in segment trimming")]
    Degenerate,
}

pub type Result<T> = std::result::Result<T, FastaError>;
