//! End-to-end invoker tests against the stub runtime.

#![cfg(unix)]

use super::*;
use crate::test_support::{REPORTING_TOOL, stub_runtime, write_tool};
use std::collections::BTreeMap;
use std::path::{MAIN_SEPARATOR, Path};
use std::time::{Duration, Instant};
use tempfile::TempDir;

fn request_for(tool: &Path, workspace: &Path) -> InvocationRequest {
    InvocationRequest::new(tool, workspace, "in", "out").with_runtime(stub_runtime())
}

#[test]
fn test_tool_output_reaches_sink_in_order() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "echo A\necho B\nexit 0\n");

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&request_for(&tool, temp.path()), &mut sink);

    assert_eq!(sink, vec!["A", "B"]);
    assert!(result.succeeded);
    assert_eq!(result.exit_code, Some(0));
    assert!(result.error_kind.is_none());
}

#[test]
fn test_nonzero_exit_is_reported() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "echo A\necho B\nexit 2\n");

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&request_for(&tool, temp.path()), &mut sink);

    assert!(!result.succeeded);
    assert_eq!(result.exit_code, Some(2));
    assert!(result.error_kind.is_none());
    assert_eq!(sink, vec!["A", "B"]);
}

#[test]
fn test_missing_tool_is_launch_failure() {
    let temp = TempDir::new().unwrap();
    let tool = temp.path().join("does-not-exist.jar");

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&request_for(&tool, temp.path()), &mut sink);

    assert!(!result.succeeded);
    assert_eq!(result.error_kind, Some(ErrorKind::LaunchFailure));
    assert!(result.exit_code.is_none());
    assert!(!sink.is_empty());
    assert!(sink.iter().any(|line| line.contains("does-not-exist.jar")));
}

#[test]
fn test_relative_tool_path_is_found_in_workspace() {
    let temp = TempDir::new().unwrap();
    std::fs::create_dir(temp.path().join("tools")).unwrap();
    write_tool(&temp.path().join("tools"), "tattletale.jar", "echo found\n");

    let req = InvocationRequest::new("tools/tattletale.jar", temp.path(), "in", "out")
        .with_runtime(stub_runtime());
    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&req, &mut sink);

    assert!(result.succeeded, "result: {:?}", result);
    assert_eq!(sink, vec!["found"]);
}

#[test]
fn test_relative_tool_path_outside_workspace_is_launch_failure() {
    let caller_dir = std::env::current_dir().unwrap();
    let name = "Cargo.toml";
    assert!(caller_dir.join(name).is_file());
    let workspace = TempDir::new().unwrap();

    let req = InvocationRequest::new(name, workspace.path(), "in", "out")
        .with_runtime(stub_runtime());
    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&req, &mut sink);

    assert_eq!(result.error_kind, Some(ErrorKind::LaunchFailure));
    assert!(result.exit_code.is_none());
    assert!(sink.iter().all(|line| !line.contains("Unable to access jarfile")));
}

#[test]
fn test_relative_properties_file_resolves_against_workspace() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "echo ran\n");
    let req = request_for(&tool, temp.path()).with_properties_file("tattletale.properties");

    let argv = req.argv();
    let expected = format!(
        "-Djboss-tattletale.properties={}",
        temp.path().join("tattletale.properties").display()
    );
    assert_eq!(argv[1], std::ffi::OsString::from(expected));

    let mut sink: Vec<String> = Vec::new();
    assert!(Invoker::new().run(&req, &mut sink).succeeded);
}

#[test]
fn test_missing_runtime_is_launch_failure() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "exit 0\n");
    let req = InvocationRequest::new(&tool, temp.path(), "in", "out")
        .with_runtime(temp.path().join("no-such-java").to_string_lossy().into_owned());

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&req, &mut sink);

    assert_eq!(result.error_kind, Some(ErrorKind::LaunchFailure));
    assert!(result.message.unwrap().contains("failed to launch"));
    assert_eq!(sink[0], "[Tattletale] Error running tattletale.");
}

#[test]
fn test_empty_subdir_is_launch_failure() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "exit 0\n");
    let req = InvocationRequest::new(&tool, temp.path(), "in", "").with_runtime(stub_runtime());

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&req, &mut sink);

    assert_eq!(result.error_kind, Some(ErrorKind::LaunchFailure));
    assert!(sink.iter().any(|line| line.contains("output directory")));
}

#[test]
fn test_paths_with_spaces_arrive_intact() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("my job");
    std::fs::create_dir_all(&workspace).unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "printf '%s\\n' \"$1\" \"$2\"\n");

    let req = InvocationRequest::new(&tool, &workspace, "lib dir", "report out")
        .with_runtime(stub_runtime());
    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&req, &mut sink);

    assert!(result.succeeded);
    let ws = workspace.to_string_lossy();
    assert_eq!(
        sink,
        vec![
            format!("{}{}lib dir", ws, MAIN_SEPARATOR),
            format!("{}{}report out", ws, MAIN_SEPARATOR),
        ]
    );
}

#[test]
fn test_runs_in_working_directory() {
    let temp = TempDir::new().unwrap();
    let workspace = temp.path().join("ws");
    std::fs::create_dir_all(&workspace).unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "pwd -P\n");

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&request_for(&tool, &workspace), &mut sink);

    assert!(result.succeeded);
    let expected = std::fs::canonicalize(&workspace).unwrap();
    assert_eq!(sink, vec![expected.to_string_lossy().into_owned()]);
}

#[test]
fn test_stderr_is_forwarded() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "echo oops >&2\nexit 3\n");

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&request_for(&tool, temp.path()), &mut sink);

    assert_eq!(result.exit_code, Some(3));
    assert_eq!(sink, vec!["oops"]);
}

#[test]
fn test_environment_is_layered_over_inherited() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(
        temp.path(),
        "tool.jar",
        "echo \"$TATTLE_TEST_VAR\"\n[ -n \"$PATH\" ] && echo has-path\n",
    );

    let mut env = BTreeMap::new();
    env.insert("TATTLE_TEST_VAR".to_string(), "from-config".to_string());
    let req = request_for(&tool, temp.path()).with_environment(env);

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&req, &mut sink);

    assert!(result.succeeded);
    assert_eq!(sink, vec!["from-config", "has-path"]);
}

#[test]
fn test_properties_file_is_passed_through() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "echo ran\n");
    let req = request_for(&tool, temp.path()).with_properties_file("/etc/tattletale.properties");

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&req, &mut sink);

    assert!(result.succeeded);
    assert_eq!(sink, vec!["ran"]);
}

#[test]
fn test_every_line_forwarded_once() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(
        temp.path(),
        "tool.jar",
        "i=1\nwhile [ $i -le 500 ]; do echo \"line $i\"; i=$((i+1)); done\n",
    );

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&request_for(&tool, temp.path()), &mut sink);

    assert!(result.succeeded);
    let expected: Vec<String> = (1..=500).map(|i| format!("line {}", i)).collect();
    assert_eq!(sink, expected);
}

#[test]
fn test_repeated_runs_are_independent() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(
        temp.path(),
        "tool.jar",
        "if [ -f marker ]; then echo second; else echo first; touch marker; fi\n",
    );
    let req = request_for(&tool, temp.path());
    let invoker = Invoker::new();

    let mut first: Vec<String> = Vec::new();
    let mut second: Vec<String> = Vec::new();
    assert!(invoker.run(&req, &mut first).succeeded);
    assert!(invoker.run(&req, &mut second).succeeded);

    assert_eq!(first, vec!["first"]);
    assert_eq!(second, vec!["second"]);
}

#[test]
fn test_reporting_tool_writes_output_tree() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", REPORTING_TOOL);

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::new().run(&request_for(&tool, temp.path()), &mut sink);

    assert!(result.succeeded);
    assert!(temp.path().join("out/index.html").is_file());
    assert!(temp.path().join("out/jar/report.html").is_file());
    assert_eq!(sink.len(), 2);
}

#[test]
fn test_timeout_interrupts_long_run() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "echo started\nexec sleep 30\n");
    let invoker = Invoker::with_cancel(CancelToken::with_timeout(Duration::from_millis(500)));

    let start = Instant::now();
    let mut sink: Vec<String> = Vec::new();
    let result = invoker.run(&request_for(&tool, temp.path()), &mut sink);

    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(!result.succeeded);
    assert_eq!(result.error_kind, Some(ErrorKind::Interrupted));
    assert!(result.exit_code.is_none());
    assert!(result.message.unwrap().contains("timed out"));
    assert_eq!(sink[0], "started");
    assert!(sink.iter().any(|line| line.contains("interrupted")));
}

#[test]
fn test_cancel_from_another_thread() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "exec sleep 30\n");
    let token = CancelToken::new();
    let invoker = Invoker::with_cancel(token.clone());

    let canceller = std::thread::spawn(move || {
        std::thread::sleep(Duration::from_millis(200));
        token.cancel();
    });

    let start = Instant::now();
    let mut sink: Vec<String> = Vec::new();
    let result = invoker.run(&request_for(&tool, temp.path()), &mut sink);
    canceller.join().unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert_eq!(result.error_kind, Some(ErrorKind::Interrupted));
    assert!(result.message.unwrap().contains("cancelled"));
}

#[test]
fn test_already_cancelled_never_spawns() {
    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "touch spawned\n");
    let token = CancelToken::new();
    token.cancel();

    let mut sink: Vec<String> = Vec::new();
    let result = Invoker::with_cancel(token).run(&request_for(&tool, temp.path()), &mut sink);

    assert_eq!(result.error_kind, Some(ErrorKind::Interrupted));
    assert!(!temp.path().join("spawned").exists());
}

#[test]
fn test_failing_sink_is_io_failure() {
    struct BrokenSink;

    impl LineSink for BrokenSink {
        fn line(&mut self, _line: &str) -> std::io::Result<()> {
            Err(std::io::Error::other("log closed"))
        }
    }

    let temp = TempDir::new().unwrap();
    let tool = write_tool(temp.path(), "tool.jar", "echo A\n");

    let result = Invoker::new().run(&request_for(&tool, temp.path()), &mut BrokenSink);

    assert_eq!(result.error_kind, Some(ErrorKind::IoFailure));
    assert!(result.message.unwrap().contains("log closed"));
}
