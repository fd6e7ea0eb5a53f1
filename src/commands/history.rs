//! Implementation of the `tattle history` command.

use super::load_job;
use crate::cli::{GlobalArgs, HistoryArgs};
use crate::error::{Result, TattleError};
use crate::events::{Event, read_events};
use crate::invoke::LineSink;

pub fn cmd_history(global: &GlobalArgs, args: HistoryArgs, out: &mut dyn LineSink) -> Result<()> {
    let (ctx, _config) = load_job(global)?;
    let events = read_events(&ctx)?;

    if events.is_empty() {
        return emit(out, "No events recorded.");
    }

    let skip = events.len().saturating_sub(args.limit);
    for event in &events[skip..] {
        emit(out, &format_event(event))?;
    }

    Ok(())
}

fn emit(out: &mut dyn LineSink, line: &str) -> Result<()> {
    out.line(line)
        .map_err(|e| TattleError::UserError(format!("failed to write history: {}", e)))
}

fn format_event(event: &Event) -> String {
    let mut line = format!(
        "{}  {:<8} {:<16}",
        event.ts.format("%Y-%m-%d %H:%M:%S"),
        event.action.to_string(),
        event.build.as_deref().unwrap_or("-"),
    );

    let details = &event.details;
    let outcome = match (
        details.get("succeeded").and_then(|v| v.as_bool()),
        details.get("files_copied").and_then(|v| v.as_u64()),
        details.get("error").and_then(|v| v.as_str()),
    ) {
        (_, _, Some(error)) => format!("failed: {}", error),
        (Some(true), _, _) => "ok".to_string(),
        (Some(false), _, _) => match (
            details.get("exit_code").and_then(|v| v.as_i64()),
            details.get("error_kind").and_then(|v| v.as_str()),
        ) {
            (Some(code), _) => format!("failed: exit code {}", code),
            (None, Some(kind)) => format!("failed: {}", kind),
            (None, None) => "failed".to_string(),
        },
        (None, Some(files), _) => format!("{} file(s) archived", files),
        (None, None, None) => String::new(),
    };

    if !outcome.is_empty() {
        line.push(' ');
        line.push_str(&outcome);
    }
    line.trim_end().to_string()
}
