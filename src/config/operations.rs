//! Config loading, validation, and conversion into run requests.

use super::model::Config;
use super::types::DEFAULT_REPORT_DIR;
use crate::error::{Result, TattleError};
use crate::invoke::InvocationRequest;
use globset::Glob;
use std::path::Path;
use std::time::Duration;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            TattleError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Load config from a YAML file, falling back to defaults when it does not exist.
    ///
    /// A file that exists but fails to parse or validate is still an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)
            .map_err(|e| TattleError::UserError(format!("failed to parse config YAML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            TattleError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `runtime` must be non-empty
    /// - `archive_includes` must be non-empty and every entry a valid glob
    /// - `environment` keys must be non-empty and contain no `=`
    ///
    /// Tool location and directories are checked when a run is requested,
    /// since `init` writes a config without them.
    pub fn validate(&self) -> Result<()> {
        if self.runtime.trim().is_empty() {
            return Err(TattleError::UserError(
                "config validation failed: runtime must not be empty".to_string(),
            ));
        }

        if self.archive_includes.is_empty() {
            return Err(TattleError::UserError(format!(
                "config validation failed: archive_includes must not be empty (use '{}' to archive everything)",
                super::types::ARCHIVE_ALL
            )));
        }

        for pattern in &self.archive_includes {
            if pattern.trim().is_empty() {
                return Err(TattleError::UserError(
                    "config validation failed: archive_includes entries must be non-empty"
                        .to_string(),
                ));
            }
            Glob::new(pattern.trim()).map_err(|e| {
                TattleError::UserError(format!(
                    "config validation failed: invalid archive_includes glob '{}': {}",
                    pattern, e
                ))
            })?;
        }

        for key in self.environment.keys() {
            if key.is_empty() || key.contains('=') {
                return Err(TattleError::UserError(format!(
                    "config validation failed: invalid environment variable name '{}'",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Report directory with surrounding whitespace removed; empty means the default.
    pub fn effective_report_dir(&self) -> &str {
        let trimmed = self.report_dir.trim();
        if trimmed.is_empty() {
            DEFAULT_REPORT_DIR
        } else {
            trimmed
        }
    }

    /// Run timeout, if one is configured.
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }

    /// Build an invocation request for `workspace`.
    ///
    /// Fails with a user error naming the first missing setting.
    pub fn invocation_request(&self, workspace: &Path) -> Result<InvocationRequest> {
        if self.tool_jar.trim().is_empty() {
            return Err(TattleError::UserError(
                "Please set the Tattletale jar location (tool_jar).".to_string(),
            ));
        }
        if self.input_directory.is_empty() {
            return Err(TattleError::UserError(
                "Please set a project location to be analyzed (input_directory).".to_string(),
            ));
        }
        if self.output_directory.is_empty() {
            return Err(TattleError::UserError(
                "Please set tattletale report directory (output_directory).".to_string(),
            ));
        }

        let mut request = InvocationRequest::new(
            self.tool_jar.trim(),
            workspace,
            self.input_directory.as_str(),
            self.output_directory.as_str(),
        )
        .with_runtime(self.runtime.trim())
        .with_environment(self.environment.clone());

        if let Some(properties) = self.properties_file.as_deref().map(str::trim)
            && !properties.is_empty()
        {
            request = request.with_properties_file(properties);
        }

        Ok(request)
    }

    /// Human-readable configuration summary for the build log.
    pub fn summary_lines(&self) -> Vec<String> {
        let unset = "(not set)";
        vec![
            format!("Input directory: {}", self.input_directory),
            format!("Output directory: {}", self.output_directory),
            format!(
                "Tattletale jar location: {}",
                non_empty(&self.tool_jar).unwrap_or(unset)
            ),
            format!(
                "Javassist jar location: {}",
                self.javassist_jar.as_deref().and_then(non_empty).unwrap_or(unset)
            ),
            format!(
                "Tattletale properties location: {}",
                self.properties_file.as_deref().and_then(non_empty).unwrap_or(unset)
            ),
        ]
    }
}

fn non_empty(value: &str) -> Option<&str> {
    let value = value.trim();
    (!value.is_empty()).then_some(value)
}
