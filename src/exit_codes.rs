//! Exit code constants for the tattle CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, missing workspace, invalid config)
//! - 2: Tool failure (launch failure, I/O failure, nonzero exit)
//! - 3: Archive failure (nothing copied, copy error)
//! - 4: Interrupted (cancelled or timed out)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, invalid configuration, or missing workspace.
pub const USER_ERROR: i32 = 1;

/// Tool failure: the analyzer could not be launched or signaled failure.
pub const TOOL_FAILURE: i32 = 2;

/// Archive failure: the report could not be copied into storage.
pub const ARCHIVE_FAILURE: i32 = 3;

/// The tool run was cancelled before it finished.
pub const INTERRUPTED: i32 = 4;
