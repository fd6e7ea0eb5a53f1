//! Error types for the tattle CLI.
//!
//! Uses thiserror for derive macros and provides user-actionable error messages.

use crate::exit_codes;
use thiserror::Error;

/// Main error type for tattle operations.
///
/// Each variant maps to a specific process exit code.
#[derive(Error, Debug)]
pub enum TattleError {
    /// User provided invalid arguments or the environment is in an invalid state.
    #[error("{0}")]
    UserError(String),

    /// The analyzer could not be launched, failed while streaming, or exited nonzero.
    #[error("Tattletale run failed: {0}")]
    ToolError(String),

    /// The report could not be copied into job or build storage.
    #[error("Report archiving failed: {0}")]
    ArchiveError(String),

    /// The analyzer run was cancelled before it finished.
    #[error("Tattletale run interrupted: {0}")]
    Interrupted(String),
}

impl TattleError {
    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            TattleError::UserError(_) => exit_codes::USER_ERROR,
            TattleError::ToolError(_) => exit_codes::TOOL_FAILURE,
            TattleError::ArchiveError(_) => exit_codes::ARCHIVE_FAILURE,
            TattleError::Interrupted(_) => exit_codes::INTERRUPTED,
        }
    }
}

/// Result type alias for tattle operations.
pub type Result<T> = std::result::Result<T, TattleError>;
