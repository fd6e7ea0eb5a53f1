//! Audit log of analyzer runs and report archives.
//!
//! One JSON object per line in `<store>/events/events.ndjson`:
//!
//! ```text
//! {"ts":"2026-10-19T14:25:01Z","action":"run","actor":"ci@build-03","build":"42","details":{"exit_code":0,...}}
//! ```
//!
//! Lines are appended and synced one at a time. A line torn by a crash is
//! skipped when the log is read back.

use crate::context::JobContext;
use crate::error::{Result, TattleError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

const EVENTS_FILE: &str = "events.ndjson";

/// What a recorded step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Init,
    Run,
    Archive,
    Build,
}

impl EventAction {
    pub fn as_str(self) -> &'static str {
        match self {
            EventAction::Init => "init",
            EventAction::Run => "run",
            EventAction::Archive => "archive",
            EventAction::Build => "build",
        }
    }
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One audit record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub ts: DateTime<Utc>,
    pub action: EventAction,
    /// `user@host` of whoever ran tattle.
    pub actor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<String>,
    /// Step-specific outcome: exit code, files copied, error text.
    #[serde(default)]
    pub details: Value,
}

impl Event {
    /// Event stamped with the current time and actor.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: actor(),
            build: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_build(mut self, build_id: impl Into<String>) -> Self {
        self.build = Some(build_id.into());
        self
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }
}

fn actor() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());
    let host = hostname::get()
        .map(|h| h.to_string_lossy().into_owned())
        .unwrap_or_else(|_| "unknown".to_string());
    format!("{}@{}", user, host)
}

pub fn events_file_path(ctx: &JobContext) -> PathBuf {
    ctx.events_dir().join(EVENTS_FILE)
}

fn log_error(what: &str, path: &Path, e: impl std::fmt::Display) -> TattleError {
    TattleError::UserError(format!("failed to {} '{}': {}", what, path.display(), e))
}

/// Append `event` to the job's log, creating the log on first use.
pub fn append_event(ctx: &JobContext, event: &Event) -> Result<()> {
    let path = events_file_path(ctx);
    let line = serde_json::to_string(event).map_err(|e| log_error("encode event for", &path, e))?;

    fs::create_dir_all(ctx.events_dir())
        .map_err(|e| log_error("create events directory", &ctx.events_dir(), e))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| log_error("open event log", &path, e))?;

    writeln!(file, "{}", line)
        .and_then(|()| file.sync_all())
        .map_err(|e| log_error("append to event log", &path, e))
}

/// Every readable event in the log, oldest first.
///
/// A missing log is empty. Lines that do not parse are skipped with a
/// warning so one torn append does not hide the rest of the history.
pub fn read_events(ctx: &JobContext) -> Result<Vec<Event>> {
    let path = events_file_path(ctx);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(log_error("read event log", &path, e)),
    };

    let events = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(index, line)| match serde_json::from_str(line) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(line = index + 1, file = %path.display(), error = %e, "skipping malformed event");
                None
            }
        })
        .collect();

    Ok(events)
}
