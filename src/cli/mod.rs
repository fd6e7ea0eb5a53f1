//! CLI argument parsing for tattle.
//!
//! Uses clap derive macros for declarative argument definitions.
//! This module defines the command structure; actual implementations
//! are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Tattle: run the JBoss Tattletale dependency analyzer against a workspace
/// and archive the generated report.
///
/// Settings come from `<workspace>/.tattle/config.yaml`; command-line flags
/// override them for a single invocation.
#[derive(Parser, Debug)]
#[command(name = "tattle")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Emit debug diagnostics on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory the analyzer runs in (default: current directory).
    #[arg(short, long, global = true, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Job storage directory (default: <workspace>/.tattle/store).
    #[arg(long, global = true, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Configuration file (default: <workspace>/.tattle/config.yaml).
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available commands for tattle.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write a default configuration file.
    ///
    /// Refuses to replace an existing file unless `--force` is given.
    Init(InitArgs),

    /// Run the analyzer once.
    ///
    /// Streams the analyzer's output and exits non-zero if it fails.
    Run(RunArgs),

    /// Copy the report from the workspace into job storage.
    Archive(ArchiveArgs),

    /// Run the analyzer, then archive its report.
    ///
    /// The report is archived even when the run fails.
    Build(BuildArgs),

    /// Print the effective configuration as YAML.
    Config(ConfigArgs),

    /// Show recent runs and archives from the event log.
    History(HistoryArgs),
}

/// Arguments for the `init` command.
#[derive(Args, Debug, Clone, Default)]
pub struct InitArgs {
    /// Overwrite an existing configuration file.
    #[arg(short, long)]
    pub force: bool,
}

/// Analyzer settings that override the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct RunOverrides {
    /// Location of the Tattletale jar.
    #[arg(long, value_name = "JAR")]
    pub tool: Option<String>,

    /// Java launcher to run the jar with.
    #[arg(long)]
    pub runtime: Option<String>,

    /// Directory to analyze, relative to the workspace.
    #[arg(long, value_name = "DIR")]
    pub input: Option<String>,

    /// Directory the report is written to, relative to the workspace.
    #[arg(long, value_name = "DIR")]
    pub output: Option<String>,

    /// Tattletale properties file.
    #[arg(long, value_name = "FILE")]
    pub properties: Option<String>,

    /// Kill the analyzer after this many seconds (0 disables the limit).
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Extra environment variable for the analyzer (repeatable).
    #[arg(short, long = "env", value_name = "KEY=VALUE", value_parser = parse_env_pair)]
    pub env: Vec<(String, String)>,
}

/// Archive settings that override the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ArchiveOverrides {
    /// Report directory to archive, relative to the workspace.
    #[arg(long, value_name = "DIR")]
    pub report_dir: Option<String>,

    /// Keep a separate copy of the report for every build.
    #[arg(long)]
    pub keep_all: bool,
}

/// Arguments for the `run` command.
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub overrides: RunOverrides,

    /// Build identifier recorded in the event log (default: a timestamp).
    #[arg(long)]
    pub build_id: Option<String>,
}

/// Arguments for the `archive` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ArchiveArgs {
    #[command(flatten)]
    pub overrides: ArchiveOverrides,

    /// Build identifier; names the per-build directory with `--keep-all`.
    #[arg(long)]
    pub build_id: Option<String>,
}

/// Arguments for the `build` command.
#[derive(Args, Debug, Clone, Default)]
pub struct BuildArgs {
    #[command(flatten)]
    pub run: RunOverrides,

    #[command(flatten)]
    pub archive: ArchiveOverrides,

    /// Build identifier (default: a timestamp).
    #[arg(long)]
    pub build_id: Option<String>,
}

/// Arguments for the `config` command.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    #[command(flatten)]
    pub run: RunOverrides,

    #[command(flatten)]
    pub archive: ArchiveOverrides,
}

/// Arguments for the `history` command.
#[derive(Args, Debug, Clone)]
pub struct HistoryArgs {
    /// Number of most recent events to show.
    #[arg(short = 'n', long, default_value_t = 20)]
    pub limit: usize,
}

fn parse_env_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
