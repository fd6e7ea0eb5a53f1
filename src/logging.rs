//! Diagnostic tracing setup.
//!
//! Diagnostics go to stderr so they never mix with the build log on stdout.
//!
//! ```text
//! tattle --verbose build          # debug-level diagnostics
//! RUST_LOG=tattle=trace tattle …  # fine-grained control, overrides --verbose
//! ```

use crate::error::{Result, TattleError};
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .compact()
        .try_init()
        .map_err(|e| TattleError::UserError(format!("failed to initialise logging: {}", e)))
}
