//! Outcome of a single analyzer invocation.

use crate::error::TattleError;
use std::fmt;

/// Why an invocation failed without producing an exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The runtime or tool jar could not be started.
    LaunchFailure,
    /// Reading the tool's output, or writing it to the sink, failed.
    IoFailure,
    /// The caller cancelled the run, or its deadline passed.
    Interrupted,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::LaunchFailure => write!(f, "launch failure"),
            ErrorKind::IoFailure => write!(f, "I/O failure"),
            ErrorKind::Interrupted => write!(f, "interrupted"),
        }
    }
}

/// Result of [`Invoker::run`](super::Invoker::run).
///
/// A run that reached process exit carries `exit_code`; a run that did not
/// carries `error_kind`. Never both, never neither.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    pub succeeded: bool,
    pub exit_code: Option<i32>,
    pub error_kind: Option<ErrorKind>,
    /// Underlying error message for `error_kind` failures.
    pub message: Option<String>,
}

impl InvocationResult {
    pub(crate) fn exited(code: i32) -> Self {
        Self {
            succeeded: code == 0,
            exit_code: Some(code),
            error_kind: None,
            message: None,
        }
    }

    pub(crate) fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            exit_code: None,
            error_kind: Some(kind),
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.succeeded
    }

    /// Convert into the crate error type, for callers that propagate with `?`.
    pub fn into_result(self) -> Result<(), TattleError> {
        if self.succeeded {
            return Ok(());
        }

        let message = self.message.unwrap_or_default();
        match (self.error_kind, self.exit_code) {
            (Some(ErrorKind::Interrupted), _) => Err(TattleError::Interrupted(message)),
            (Some(kind), _) => Err(TattleError::ToolError(format!("{}: {}", kind, message))),
            (None, Some(code)) => Err(TattleError::ToolError(format!(
                "tattletale exited with code {}",
                code
            ))),
            (None, None) => Err(TattleError::ToolError(
                "tattletale finished without an exit status".to_string(),
            )),
        }
    }
}
