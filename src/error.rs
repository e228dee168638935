use std::collections::TryReserveError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a folder lookup.
///
/// Anything that merely means "this folder has no value here" (unset variables, missing
/// files, malformed lines, unsupported platform/folder combinations) is reported as
/// `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum Error {
    /// An intermediate or returned buffer could not be allocated.
    #[error("out of memory while resolving a known folder")]
    OutOfMemory,

    /// Line `Parse::line` (1-based) of a `user-dirs.dirs` file names the requested variable,
    /// but its value is malformed. Only raised in [`Strictness::Strict`](crate::folders::user_dirs::Strictness::Strict) mode.
    #[error("malformed assignment on line {line} of user-dirs.dirs")]
    Parse { line: usize },

    /// Opening or reading `Io::path` failed for a reason other than it not existing.
    #[error("failed to access `{}`", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<TryReserveError> for Error {
    fn from(_: TryReserveError) -> Self {
        Error::OutOfMemory
    }
}

/// Shorthand used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
