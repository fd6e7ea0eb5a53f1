//! Report archiving.
//!
//! After the analyzer has written its report into the workspace, the archiver
//! copies it into job storage so it outlives the workspace:
//!
//! - Without `keep_all`, every build overwrites `<store>/tattletale-report`
//! - With `keep_all`, each build keeps `<store>/builds/<id>/tattletale-report`
//!
//! The workspace-relative report directory may reference build environment
//! variables (`$BUILD_ID`, `${MODULE}`).

mod expand;

pub use expand::{build_environment, expand_vars};

use crate::config::Config;
use crate::context::JobContext;
use crate::error::{Result, TattleError};
use crate::fs::{build_includes, copy_tree};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::debug;

/// A resolved archive operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    /// Report directory inside the workspace.
    pub source: PathBuf,
    /// Storage directory the report is copied into.
    pub target: PathBuf,
    /// Include globs, relative to `source`.
    pub includes: Vec<String>,
}

impl ArchiveRequest {
    /// Plan the archive of one build's report.
    ///
    /// `env` is the build environment used to expand `report_dir`.
    pub fn plan(
        ctx: &JobContext,
        config: &Config,
        build_id: &str,
        env: &BTreeMap<String, String>,
    ) -> Self {
        let report_dir = expand_vars(config.effective_report_dir(), env);
        let target = if config.keep_all {
            ctx.build_report_dir(build_id)
        } else {
            ctx.job_report_dir()
        };

        Self {
            source: ctx.workspace.join(report_dir),
            target,
            includes: config.archive_includes.clone(),
        }
    }
}

/// What an archive run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveOutcome {
    pub target: PathBuf,
    pub files_copied: usize,
}

/// Copy the report into storage.
///
/// Copying nothing is a failure: either the tool wrote no report or the
/// report directory is misconfigured.
pub fn archive_report(request: &ArchiveRequest) -> Result<ArchiveOutcome> {
    let includes = build_includes(&request.includes).map_err(|e| {
        TattleError::UserError(format!("invalid archive include pattern: {}", e))
    })?;

    debug!(
        source = %request.source.display(),
        target = %request.target.display(),
        "archiving report"
    );

    let files_copied = copy_tree(&request.source, &request.target, &includes)
        .map_err(|e| TattleError::ArchiveError(format!("failed to record data: {}", e)))?;

    if files_copied == 0 {
        let hint = if request.source.is_dir() {
            format!(
                "no files in '{}' matched {:?}",
                request.source.display(),
                request.includes
            )
        } else {
            format!("'{}' does not exist", request.source.display())
        };
        return Err(TattleError::ArchiveError(format!(
            "No data copied, configuration error? ({})",
            hint
        )));
    }

    Ok(ArchiveOutcome {
        target: request.target.clone(),
        files_copied,
    })
}
