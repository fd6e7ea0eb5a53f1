//! Workspace and storage path resolution for tattle.
//!
//! Every command resolves a [`JobContext`] first so that the tool, the
//! archiver, and the event log agree on where things live:
//!
//! ```text
//! <workspace>/.tattle/config.yaml                        configuration
//! <store>/tattletale-report/                             job-level report
//! <store>/builds/<build-id>/tattletale-report/           per-build report (keep_all)
//! <store>/events/events.ndjson                           audit log
//! ```
//!
//! `<store>` defaults to `<workspace>/.tattle/store`.

use crate::config::DEFAULT_REPORT_DIR;
use crate::error::{Result, TattleError};
use std::env;
use std::path::{Path, PathBuf};

/// Name of the per-workspace tattle directory.
pub const TATTLE_DIR: &str = ".tattle";

/// Config file name within the tattle directory.
pub const CONFIG_FILE: &str = "config.yaml";

/// Default store directory name within the tattle directory.
pub const DEFAULT_STORE_DIR: &str = "store";

/// Resolved paths for one job. All paths are absolute.
#[derive(Debug, Clone)]
pub struct JobContext {
    /// The workspace the tool runs in.
    pub workspace: PathBuf,

    /// Path to the configuration file (may not exist).
    pub config_path: PathBuf,

    /// Root of persisted job storage.
    pub store_root: PathBuf,
}

impl JobContext {
    /// Resolve a context for `workspace` (default: current directory).
    ///
    /// A missing workspace is an error. `store` and `config` override the
    /// default locations; relative overrides are taken from the current
    /// directory.
    pub fn resolve(
        workspace: Option<&Path>,
        store: Option<&Path>,
        config: Option<&Path>,
    ) -> Result<Self> {
        let cwd = env::current_dir().map_err(|e| {
            TattleError::UserError(format!("failed to get current working directory: {}", e))
        })?;

        let workspace = match workspace {
            Some(path) => absolutize(&cwd, path),
            None => cwd.clone(),
        };

        if !workspace.is_dir() {
            return Err(TattleError::UserError(format!(
                "workspace '{}' does not exist or is not a directory.\n\n\
                 Pass --workspace with the project directory to analyze.",
                workspace.display()
            )));
        }

        let workspace = workspace.canonicalize().map_err(|e| {
            TattleError::UserError(format!(
                "failed to resolve workspace '{}': {}",
                workspace.display(),
                e
            ))
        })?;

        let tattle_dir = workspace.join(TATTLE_DIR);
        let config_path = config
            .map(|p| absolutize(&cwd, p))
            .unwrap_or_else(|| tattle_dir.join(CONFIG_FILE));
        let store_root = store
            .map(|p| absolutize(&cwd, p))
            .unwrap_or_else(|| tattle_dir.join(DEFAULT_STORE_DIR));

        Ok(Self {
            workspace,
            config_path,
            store_root,
        })
    }

    /// Job-level report directory (overwritten by each archive without keep_all).
    pub fn job_report_dir(&self) -> PathBuf {
        self.store_root.join(DEFAULT_REPORT_DIR)
    }

    /// Directory holding everything recorded for one build.
    pub fn build_dir(&self, build_id: &str) -> PathBuf {
        self.store_root.join("builds").join(build_id)
    }

    /// Per-build report directory.
    pub fn build_report_dir(&self, build_id: &str) -> PathBuf {
        self.build_dir(build_id).join(DEFAULT_REPORT_DIR)
    }

    /// Directory holding the NDJSON event log.
    pub fn events_dir(&self) -> PathBuf {
        self.store_root.join("events")
    }
}

fn absolutize(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Validate a build identifier supplied on the command line.
///
/// Build ids become directory names, so they are limited to
/// `[A-Za-z0-9._-]` and may not be `.` or `..`.
pub fn validate_build_id(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));

    if valid {
        Ok(id)
    } else {
        Err(TattleError::UserError(format!(
            "invalid build id '{}': use letters, digits, '.', '_' or '-'",
            id
        )))
    }
}

/// Default build id: the current UTC time, e.g. `20261019-142501`.
pub fn default_build_id() -> String {
    chrono::Utc::now().format("%Y%m%d-%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolve_uses_default_layout() {
        let temp = TempDir::new().unwrap();
        let ctx = JobContext::resolve(Some(temp.path()), None, None).unwrap();

        let ws = temp.path().canonicalize().unwrap();
        assert_eq!(ctx.workspace, ws);
        assert_eq!(ctx.config_path, ws.join(".tattle/config.yaml"));
        assert_eq!(ctx.store_root, ws.join(".tattle/store"));
        assert_eq!(ctx.job_report_dir(), ws.join(".tattle/store/tattletale-report"));
        assert_eq!(
            ctx.build_report_dir("42"),
            ws.join(".tattle/store/builds/42/tattletale-report")
        );
        assert_eq!(ctx.events_dir(), ws.join(".tattle/store/events"));
    }

    #[test]
    fn resolve_honours_overrides() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("jobs/app");
        let config = temp.path().join("etc/tattle.yaml");

        let ctx = JobContext::resolve(Some(temp.path()), Some(&store), Some(&config)).unwrap();

        assert_eq!(ctx.store_root, store);
        assert_eq!(ctx.config_path, config);
    }

    #[test]
    fn resolve_rejects_missing_workspace() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("gone");

        let err = JobContext::resolve(Some(&missing), None, None).unwrap_err();
        assert!(matches!(err, TattleError::UserError(_)));
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn resolve_rejects_file_as_workspace() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        assert!(JobContext::resolve(Some(&file), None, None).is_err());
    }

    #[test]
    fn build_id_validation() {
        assert!(validate_build_id("42").is_ok());
        assert!(validate_build_id("2026-10-19_nightly.1").is_ok());
        assert!(validate_build_id("").is_err());
        assert!(validate_build_id("..").is_err());
        assert!(validate_build_id("a/b").is_err());
        assert!(validate_build_id("a b").is_err());
    }

    #[test]
    fn default_build_id_is_valid() {
        let id = default_build_id();
        assert!(validate_build_id(&id).is_ok());
        assert_eq!(id.len(), "20261019-142501".len());
    }
}
