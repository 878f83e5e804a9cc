//! Fatal error conditions of the search pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use bulk_sync::AbortError;

/// Everything that can end a run early. All variants are fatal: the worker
/// group is torn down as a whole, never left partially running.
#[derive(Debug, Error)]
pub enum Error {
    #[error("usage: maze-escape [-w NUM] <input> <output>")]
    Usage,

    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("malformed input: {0}")]
    Parse(String),

    #[error(transparent)]
    Aborted(#[from] AbortError),
}
