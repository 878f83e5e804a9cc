//! Fatal error conditions of the simulation pipeline.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use bulk_sync::AbortError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("usage: bouncing-balls [-w NUM] <input> <output>")]
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
