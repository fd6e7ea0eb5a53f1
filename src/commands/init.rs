//! Implementation of the `tattle init` command.

use super::{log_line, record_event};
use crate::cli::{GlobalArgs, InitArgs};
use crate::config::Config;
use crate::context::JobContext;
use crate::error::{Result, TattleError};
use crate::events::{Event, EventAction};
use crate::fs::atomic_write_file;
use crate::invoke::LineSink;
use serde_json::json;

/// Write the default configuration to the job's config path.
pub fn cmd_init(global: &GlobalArgs, args: InitArgs, out: &mut dyn LineSink) -> Result<()> {
    let ctx = JobContext::resolve(
        global.workspace.as_deref(),
        global.store.as_deref(),
        global.config.as_deref(),
    )?;

    let existed = ctx.config_path.exists();
    if existed && !args.force {
        return Err(TattleError::UserError(format!(
            "config file '{}' already exists.\n\n\
             To replace it with the defaults, run:\n  tattle init --force",
            ctx.config_path.display()
        )));
    }

    let yaml = Config::default().to_yaml()?;
    atomic_write_file(&ctx.config_path, &yaml)?;

    let event = Event::new(EventAction::Init).with_details(json!({
        "config_path": ctx.config_path.display().to_string(),
        "replaced": existed
    }));
    record_event(&ctx, &event);

    log_line(
        out,
        &format!("Wrote default config to {}", ctx.config_path.display()),
    );
    log_line(
        out,
        "Set tool_jar, input_directory and output_directory before running.",
    );

    Ok(())
}
