//! Fixtures shared by tests: a stand-in Java runtime and analyzer scripts.
//!
//! The stub runtime accepts `[-D...]* -jar <jar> <args...>`, fails like
//! `java` does when the jar is missing, and otherwise runs the "jar" as a
//! POSIX shell script with the remaining arguments.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::TempDir;

const STUB_RUNTIME: &str = r#"#!/bin/sh
while [ "$#" -gt 0 ]; do
  case "$1" in
    -D*) shift ;;
    *) break ;;
  esac
done
if [ "$1" != "-jar" ]; then
  echo "stub runtime: expected -jar, got '$1'" >&2
  exit 64
fi
shift
if [ ! -f "$1" ]; then
  echo "Error: Unable to access jarfile $1" >&2
  exit 1
fi
exec /bin/sh "$@"
"#;

// Written once per test binary so no test execs a file another thread may
// still hold open for writing.
static STUB_RUNTIME_DIR: LazyLock<TempDir> = LazyLock::new(|| {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("java");
    std::fs::write(&path, STUB_RUNTIME).unwrap();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    dir
});

/// Absolute path to the stub runtime.
pub(crate) fn stub_runtime() -> String {
    STUB_RUNTIME_DIR
        .path()
        .join("java")
        .to_string_lossy()
        .into_owned()
}

/// Write a fake analyzer "jar" (a shell script) into `dir`.
pub(crate) fn write_tool(dir: &Path, name: &str, script: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, script).unwrap();
    path
}

/// Analyzer script that writes an HTML report into its output directory.
pub(crate) const REPORTING_TOOL: &str = r#"echo "Scanning $1"
mkdir -p "$2/jar"
echo "<html>index</html>" > "$2/index.html"
echo "<html>jar</html>" > "$2/jar/report.html"
echo "Report written to $2"
"#;
