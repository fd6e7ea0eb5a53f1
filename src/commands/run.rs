//! Implementation of the `tattle run` command.

use super::{apply_run_overrides, load_job, log_line, record_event, resolve_build_id};
use crate::cli::{GlobalArgs, RunArgs};
use crate::config::Config;
use crate::context::JobContext;
use crate::error::Result;
use crate::events::{Event, EventAction};
use crate::invoke::{CancelToken, InvocationResult, Invoker, LineSink};
use serde_json::json;
use std::time::Instant;
use tracing::info;

pub fn cmd_run(global: &GlobalArgs, args: RunArgs, out: &mut dyn LineSink) -> Result<()> {
    let (ctx, mut config) = load_job(global)?;
    apply_run_overrides(&mut config, &args.overrides);
    config.validate()?;
    let build_id = resolve_build_id(args.build_id.as_deref())?;

    run_analysis(&ctx, &config, &build_id, out)?.into_result()
}

/// Log the configuration, run the analyzer, and record a `run` event.
///
/// Settings that prevent a run from being attempted are errors; anything
/// that happens once the run starts is reported through the returned
/// result.
pub(super) fn run_analysis(
    ctx: &JobContext,
    config: &Config,
    build_id: &str,
    out: &mut dyn LineSink,
) -> Result<InvocationResult> {
    for line in config.summary_lines() {
        log_line(out, &line);
    }
    log_line(out, "");

    let mut request = config.invocation_request(&ctx.workspace)?;
    request.environment.insert(
        "WORKSPACE".to_string(),
        ctx.workspace.to_string_lossy().into_owned(),
    );
    request
        .environment
        .insert("BUILD_ID".to_string(), build_id.to_string());

    log_line(out, "[Tattletale] Starting analysis.");
    log_line(
        out,
        &format!("[Tattletale] Workspace path: {}", ctx.workspace.display()),
    );
    log_line(
        out,
        &format!("[Tattletale] Running $ {}", request.display_command()),
    );

    let cancel = match config.timeout() {
        Some(timeout) => CancelToken::with_timeout(timeout),
        None => CancelToken::new(),
    };

    info!(build = build_id, workspace = %ctx.workspace.display(), "starting tattletale");
    let started = Instant::now();
    let result = Invoker::with_cancel(cancel).run(&request, out);
    let duration_ms = started.elapsed().as_millis() as u64;

    if result.succeeded {
        log_line(out, "[Tattletale] Finished analysis.");
    }

    let event = Event::new(EventAction::Run)
        .with_build(build_id)
        .with_details(json!({
            "workspace": ctx.workspace.display().to_string(),
            "command": request.display_command(),
            "succeeded": result.succeeded,
            "exit_code": result.exit_code,
            "error_kind": result.error_kind.map(|kind| kind.to_string()),
            "message": result.message,
            "duration_ms": duration_ms
        }));
    record_event(ctx, &event);

    Ok(result)
}
