//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for a tattle job.
///
/// This struct represents the contents of `.tattle/config.yaml` and stands in
/// for the host's global builder settings. Unknown fields in the YAML are
/// ignored for forward compatibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Tool settings
    // =========================================================================
    /// Tattletale jar; a relative path is taken from the workspace.
    pub tool_jar: String,

    /// Program used to run the jar (default: "java").
    #[serde(default = "default_runtime")]
    pub runtime: String,

    /// Javassist jar location (informational; logged with the configuration).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub javassist_jar: Option<String>,

    /// Tattletale properties file, passed as `-Djboss-tattletale.properties`.
    /// Relative paths are taken from the workspace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties_file: Option<String>,

    /// Seconds before a run is interrupted (0 disables).
    pub timeout_secs: u64,

    /// Extra environment variables for the tool and for report_dir expansion.
    pub environment: BTreeMap<String, String>,

    // =========================================================================
    // Analysis settings
    // =========================================================================
    /// Directory to analyze, relative to the workspace.
    pub input_directory: String,

    /// Directory the report is written to, relative to the workspace.
    #[serde(default = "default_output_directory")]
    pub output_directory: String,

    // =========================================================================
    // Archive settings
    // =========================================================================
    /// Report directory to archive, relative to the workspace. `$VAR` and
    /// `${VAR}` are expanded from the build environment.
    #[serde(default = "default_report_dir")]
    pub report_dir: String,

    /// Keep a report per build instead of one per job.
    pub keep_all: bool,

    /// Globs (relative to the report directory) selecting files to archive.
    #[serde(default = "default_archive_includes")]
    pub archive_includes: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tool_jar: String::new(),
            runtime: default_runtime(),
            javassist_jar: None,
            properties_file: None,
            timeout_secs: 0,
            environment: BTreeMap::new(),
            input_directory: String::new(),
            output_directory: default_output_directory(),
            report_dir: default_report_dir(),
            keep_all: false,
            archive_includes: default_archive_includes(),
        }
    }
}
