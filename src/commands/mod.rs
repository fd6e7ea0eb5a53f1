//! Command implementations for tattle.
//!
//! This module provides the dispatcher that routes CLI commands to their
//! implementations, plus the plumbing they share: resolving the job,
//! applying command-line overrides, and writing the build log.

mod archive;
mod build;
mod config_cmd;
mod history;
mod init;
mod run;


use crate::cli::{ArchiveOverrides, Command, GlobalArgs, RunOverrides};
use crate::config::Config;
use crate::context::{JobContext, default_build_id, validate_build_id};
use crate::error::Result;
use crate::events::{Event, append_event};
use crate::invoke::{LineSink, WriterSink};
use std::io;
use tracing::warn;

/// Dispatch a command to its implementation.
///
/// Build-log output (analyzer lines and `[Tattletale]` status lines) goes
/// to stdout.
pub fn dispatch(global: &GlobalArgs, command: Command) -> Result<()> {
    let mut out = WriterSink::new(io::stdout().lock());

    match command {
        Command::Init(args) => init::cmd_init(global, args, &mut out),
        Command::Run(args) => run::cmd_run(global, args, &mut out),
        Command::Archive(args) => archive::cmd_archive(global, args, &mut out),
        Command::Build(args) => build::cmd_build(global, args, &mut out),
        Command::Config(args) => config_cmd::cmd_config(global, args, &mut out),
        Command::History(args) => history::cmd_history(global, args, &mut out),
    }
}

/// Resolve the job context and load its configuration.
///
/// An explicitly passed `--config` must exist; the default location may be
/// absent, in which case defaults apply.
fn load_job(global: &GlobalArgs) -> Result<(JobContext, Config)> {
    let ctx = JobContext::resolve(
        global.workspace.as_deref(),
        global.store.as_deref(),
        global.config.as_deref(),
    )?;

    let config = if global.config.is_some() {
        Config::load(&ctx.config_path)?
    } else {
        Config::load_or_default(&ctx.config_path)?
    };

    Ok((ctx, config))
}

fn apply_run_overrides(config: &mut Config, overrides: &RunOverrides) {
    if let Some(tool) = &overrides.tool {
        config.tool_jar = tool.clone();
    }
    if let Some(runtime) = &overrides.runtime {
        config.runtime = runtime.clone();
    }
    if let Some(input) = &overrides.input {
        config.input_directory = input.clone();
    }
    if let Some(output) = &overrides.output {
        config.output_directory = output.clone();
    }
    if let Some(properties) = &overrides.properties {
        config.properties_file = Some(properties.clone());
    }
    if let Some(timeout) = overrides.timeout_secs {
        config.timeout_secs = timeout;
    }
    config.environment.extend(overrides.env.iter().cloned());
}

fn apply_archive_overrides(config: &mut Config, overrides: &ArchiveOverrides) {
    if let Some(report_dir) = &overrides.report_dir {
        config.report_dir = report_dir.clone();
    }
    if overrides.keep_all {
        config.keep_all = true;
    }
}

fn resolve_build_id(requested: Option<&str>) -> Result<String> {
    match requested {
        Some(id) => validate_build_id(id).map(str::to_string),
        None => Ok(default_build_id()),
    }
}

/// Write a status line to the build log.
///
/// A broken build log must not mask the result of the step being logged.
fn log_line(out: &mut dyn LineSink, line: &str) {
    if let Err(e) = out.line(line) {
        warn!(error = %e, "failed to write build log");
    }
}

/// Append an audit event without failing the command.
fn record_event(ctx: &JobContext, event: &Event) {
    if let Err(e) = append_event(ctx, event) {
        warn!(action = %event.action, error = %e, "failed to record event");
    }
}
