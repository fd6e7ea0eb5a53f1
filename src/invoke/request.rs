//! Invocation request and command-line construction.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::path::{MAIN_SEPARATOR_STR, PathBuf};

/// Default runtime used to launch the analyzer jar.
pub const DEFAULT_RUNTIME: &str = "java";

/// JVM system property Tattletale reads its properties file location from.
pub const PROPERTIES_SYSTEM_PROPERTY: &str = "jboss-tattletale.properties";

/// Everything needed to launch one analyzer run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationRequest {
    /// Path to the analyzer jar.
    pub tool_path: PathBuf,
    /// Workspace root; the process runs here and the I/O paths hang off it.
    pub working_directory: PathBuf,
    /// Input directory relative to the workspace.
    pub input_subdir: String,
    /// Output (report) directory relative to the workspace.
    pub output_subdir: String,
    /// Program used to run the jar (default: `java`).
    pub runtime: String,
    /// Optional Tattletale properties file passed as a JVM system property.
    pub properties_file: Option<PathBuf>,
    /// Extra environment variables layered over the inherited environment.
    pub environment: BTreeMap<String, String>,
}

impl InvocationRequest {
    pub fn new(
        tool_path: impl Into<PathBuf>,
        working_directory: impl Into<PathBuf>,
        input_subdir: impl Into<String>,
        output_subdir: impl Into<String>,
    ) -> Self {
        Self {
            tool_path: tool_path.into(),
            working_directory: working_directory.into(),
            input_subdir: input_subdir.into(),
            output_subdir: output_subdir.into(),
            runtime: DEFAULT_RUNTIME.to_string(),
            properties_file: None,
            environment: BTreeMap::new(),
        }
    }

    pub fn with_runtime(mut self, runtime: impl Into<String>) -> Self {
        self.runtime = runtime.into();
        self
    }

    pub fn with_properties_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.properties_file = Some(path.into());
        self
    }

    pub fn with_environment(mut self, environment: BTreeMap<String, String>) -> Self {
        self.environment = environment;
        self
    }

    /// Name of the first empty required field, if any.
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.runtime.trim().is_empty() {
            Some("runtime")
        } else if self.tool_path.as_os_str().is_empty() {
            Some("tool path")
        } else if self.working_directory.as_os_str().is_empty() {
            Some("working directory")
        } else if self.input_subdir.is_empty() {
            Some("input directory")
        } else if self.output_subdir.is_empty() {
            Some("output directory")
        } else {
            None
        }
    }

    /// `<working_directory><sep><input_subdir>`, concatenated verbatim.
    pub fn input_path(&self) -> OsString {
        workspace_child(&self.working_directory, &self.input_subdir)
    }

    /// `<working_directory><sep><output_subdir>`, concatenated verbatim.
    pub fn output_path(&self) -> OsString {
        workspace_child(&self.working_directory, &self.output_subdir)
    }

    /// Tool jar location as the child sees it: relative paths are taken
    /// from the working directory, not from the caller's.
    pub fn resolved_tool_path(&self) -> PathBuf {
        self.working_directory.join(&self.tool_path)
    }

    /// Properties file location, resolved like [`Self::resolved_tool_path`].
    pub fn resolved_properties_file(&self) -> Option<PathBuf> {
        self.properties_file
            .as_ref()
            .map(|path| self.working_directory.join(path))
    }

    /// Arguments passed to the runtime, in order.
    pub fn args(&self) -> Vec<OsString> {
        let mut args = Vec::with_capacity(5);

        if let Some(properties) = self.resolved_properties_file() {
            let mut define = OsString::from(format!("-D{}=", PROPERTIES_SYSTEM_PROPERTY));
            define.push(properties.as_os_str());
            args.push(define);
        }

        args.push(OsString::from("-jar"));
        args.push(self.resolved_tool_path().into_os_string());
        args.push(self.input_path());
        args.push(self.output_path());
        args
    }

    /// Full argument vector including the runtime.
    pub fn argv(&self) -> Vec<OsString> {
        let mut argv = vec![OsString::from(&self.runtime)];
        argv.extend(self.args());
        argv
    }

    /// Shell-quoted rendering of the command for build logs.
    pub fn display_command(&self) -> String {
        let words: Vec<String> = self
            .argv()
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        shell_words::join(words)
    }
}

fn workspace_child(root: &std::path::Path, child: &str) -> OsString {
    let mut joined = root.as_os_str().to_os_string();
    joined.push(MAIN_SEPARATOR_STR);
    joined.push(OsStr::new(child));
    joined
}
