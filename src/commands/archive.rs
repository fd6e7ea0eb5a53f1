//! Implementation of the `tattle archive` command.

use super::{apply_archive_overrides, load_job, log_line, record_event, resolve_build_id};
use crate::archive::{ArchiveOutcome, ArchiveRequest, archive_report, build_environment};
use crate::cli::{ArchiveArgs, GlobalArgs};
use crate::config::Config;
use crate::context::JobContext;
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::invoke::LineSink;
use serde_json::json;

pub fn cmd_archive(global: &GlobalArgs, args: ArchiveArgs, out: &mut dyn LineSink) -> Result<()> {
    let (ctx, mut config) = load_job(global)?;
    apply_archive_overrides(&mut config, &args.overrides);
    let build_id = resolve_build_id(args.build_id.as_deref())?;

    archive_step(&ctx, &config, &build_id, out).map(|_| ())
}

/// Copy the workspace report into storage and record an `archive` event.
pub(super) fn archive_step(
    ctx: &JobContext,
    config: &Config,
    build_id: &str,
    out: &mut dyn LineSink,
) -> Result<ArchiveOutcome> {
    log_line(out, "[Tattletale] Publishing");

    let env = build_environment(&ctx.workspace, build_id, &config.environment);
    let request = ArchiveRequest::plan(ctx, config, build_id, &env);
    let outcome = archive_report(&request);

    let mut details = json!({
        "source": request.source.display().to_string(),
        "target": request.target.display().to_string(),
        "keep_all": config.keep_all,
    });

    match &outcome {
        Ok(done) => {
            log_line(
                out,
                &format!(
                    "[Tattletale] Archived {} file(s) to {}",
                    done.files_copied,
                    done.target.display()
                ),
            );
            details["files_copied"] = json!(done.files_copied);
        }
        Err(e) => {
            log_line(out, &format!("[Tattletale] {}", e));
            details["error"] = json!(e.to_string());
        }
    }

    let event = Event::new(EventAction::Archive)
        .with_build(build_id)
        .with_details(details);
    record_event(ctx, &event);

    outcome
}
