// error.rs

use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DashError {
    /// Settings file missing or unreadable. Nothing sensible can be shown without setpoints.
    #[error("cannot read settings file {path:?}: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read sensor log {path:?}: {source}")]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed log record: {0}")]
    MalformedLogRecord(String),

    #[error("graph renderer failed: {0}")]
    RendererInvocationFailed(String),
}

pub type DashResult<T> = Result<T, DashError>;

// EOF
