use thiserror::Error;

use crate::io::IoError;

/// Errors produced by the script engine boundary.
///
/// All of these are fatal to the whole run: they indicate broken
/// configuration or a broken test script, never a failing assertion.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The configured test directory does not exist.
    #[error("unable to find test directory `{path}`")]
    MissingTestDir { path: String },

    /// The test directory could not be enumerated.
    #[error("failed to scan test directory `{path}`: {source}")]
    ScanTestDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A discovered script could not be read.
    #[error("failed to read test script `{path}`: {source}")]
    ReadScript {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A discovered script is not valid for the embedded engine.
    #[error("failed to compile test script `{path}`: {source}")]
    CompileScript {
        path: String,
        #[source]
        source: rhai::ParseError,
    },

    /// A script raised an engine-level error while executing.
    #[error("test script `{path}` failed: {source}")]
    RunScript {
        path: String,
        #[source]
        source: Box<rhai::EvalAltResult>,
    },
}

/// Errors produced by the `run` command boundary.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Script(#[from] ScriptError),

    #[error(transparent)]
    Io(#[from] IoError),
}
