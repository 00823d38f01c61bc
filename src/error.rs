//! Error taxonomy for the `show` command.
//!
//! Per-table retrieval failures live in [`crate::platform::QueryError`]; they
//! never abort a report. The variants here are the ones that end the whole
//! invocation.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::cmd::selection::InvalidFilterError;

/// Why the invocation was rejected before anything was queried.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InvalidInput {
    /// `--system` was not given at all
    #[error("missing required target: --system [nfit,pcat,pmtt]")]
    MissingSystemTarget,

    /// `--system` named something other than a known table
    #[error(transparent)]
    Filter(#[from] InvalidFilterError),
}

/// Terminal outcome of a failed `show` invocation.
#[derive(Error, Debug)]
pub enum ShowError {
    /// Bad arguments, nothing queried
    #[error(transparent)]
    InvalidInput(#[from] InvalidInput),

    /// The firmware table source could not be reached at all
    #[error("unable to open the platform configuration tables at '{}'", path.display())]
    CollaboratorUnavailable {
        /// Directory that was probed
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: io::Error,
    },

    /// At least one required table could not be reported
    #[error("failed to report the requested ACPI tables")]
    ReportFailed,
}

impl ShowError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            ShowError::ReportFailed => 1,
            ShowError::InvalidInput(_) => 2,
            ShowError::CollaboratorUnavailable { .. } => 3,
        }
    }
}

impl From<InvalidFilterError> for ShowError {
    fn from(err: InvalidFilterError) -> Self {
        ShowError::InvalidInput(InvalidInput::Filter(err))
    }
}
