//! Implementation of the `tattle config` command.

use super::{apply_archive_overrides, apply_run_overrides, load_job};
use crate::cli::{ConfigArgs, GlobalArgs};
use crate::error::{Result, TattleError};
use crate::invoke::LineSink;

/// Print the configuration a `build` with the same flags would use.
pub fn cmd_config(global: &GlobalArgs, args: ConfigArgs, out: &mut dyn LineSink) -> Result<()> {
    let (_ctx, mut config) = load_job(global)?;
    apply_run_overrides(&mut config, &args.run);
    apply_archive_overrides(&mut config, &args.archive);
    config.validate()?;

    let yaml = config.to_yaml()?;
    for line in yaml.lines() {
        out.line(line).map_err(|e| {
            TattleError::UserError(format!("failed to write configuration: {}", e))
        })?;
    }

    Ok(())
}
