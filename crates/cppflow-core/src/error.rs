use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the cppflow core.
#[derive(Debug, Error)]
pub enum FlowError {
    /// The test-source directory could not be listed.
    #[error("failed to read test directory '{}'", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The build directory could not be removed or recreated.
    #[error("failed to clean build directory '{}'", path.display())]
    Clean {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An external program could not be started.
    #[error("failed to start '{program}'")]
    ProcessInvocation {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid selection '{0}': expected a test index")]
    InvalidSelection(String),

    #[error("invalid input '{0}': expected 0 (Debug)")]
    InvalidTopLevelChoice(String),

    /// Input ended before an answer was given.
    #[error("cancelled by user")]
    Cancelled,

    #[error("failed to read console input")]
    Console(#[source] io::Error),

    #[error("invalid config '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },
}

pub type Result<T, E = FlowError> = std::result::Result<T, E>;
