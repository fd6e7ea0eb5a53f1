//! Implementation of the `tattle build` command: run, then archive.

use super::archive::archive_step;
use super::run::run_analysis;
use super::{
    apply_archive_overrides, apply_run_overrides, load_job, record_event, resolve_build_id,
};
use crate::cli::{BuildArgs, GlobalArgs};
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::invoke::LineSink;
use serde_json::json;
use tracing::debug;

/// Run the analyzer and archive its report.
///
/// Archiving runs whenever the analyzer was started, since a failed run may
/// still have produced a partial report. When both steps fail the analyzer's
/// error is returned. A configuration that prevents the run from starting
/// fails before anything is archived.
pub fn cmd_build(global: &GlobalArgs, args: BuildArgs, out: &mut dyn LineSink) -> Result<()> {
    let (ctx, mut config) = load_job(global)?;
    apply_run_overrides(&mut config, &args.run);
    apply_archive_overrides(&mut config, &args.archive);
    config.validate()?;
    let build_id = resolve_build_id(args.build_id.as_deref())?;

    let run = run_analysis(&ctx, &config, &build_id, out)?;
    let archived = archive_step(&ctx, &config, &build_id, out);

    let event = Event::new(EventAction::Build)
        .with_build(&build_id)
        .with_details(json!({
            "succeeded": run.succeeded && archived.is_ok(),
            "run_succeeded": run.succeeded,
            "exit_code": run.exit_code,
            "archived": archived.is_ok(),
            "files_copied": archived.as_ref().ok().map(|o| o.files_copied),
            "error": archived.as_ref().err().map(|e| e.to_string()),
        }));
    record_event(&ctx, &event);

    debug!(build = %build_id, run = run.succeeded, archived = archived.is_ok(), "build finished");

    run.into_result()?;
    archived.map(|_| ())
}
