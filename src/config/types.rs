//! Configuration defaults for tattle.
//!
//! Default value functions used by serde and by `Config::default`.

/// Directory name used for archived reports, both in the workspace and in storage.
pub const DEFAULT_REPORT_DIR: &str = "tattletale-report";

/// Glob matching every file under the report directory.
pub const ARCHIVE_ALL: &str = "**/*";

pub(crate) fn default_runtime() -> String {
    crate::invoke::DEFAULT_RUNTIME.to_string()
}
pub(crate) fn default_output_directory() -> String {
    DEFAULT_REPORT_DIR.to_string()
}
pub(crate) fn default_report_dir() -> String {
    DEFAULT_REPORT_DIR.to_string()
}
pub(crate) fn default_archive_includes() -> Vec<String> {
    vec![ARCHIVE_ALL.to_string()]
}
