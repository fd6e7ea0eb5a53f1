//! Tattle: run the JBoss Tattletale dependency analyzer against a workspace
//! and archive the generated report.
//!
//! The core is [`invoke::Invoker`], which runs
//! `java -jar <tattletale.jar> <workspace>/<input> <workspace>/<output>` with
//! the workspace as its working directory and streams every output line to a
//! [`invoke::LineSink`]. [`archive`] copies the finished report into job
//! storage, and the `tattle` binary ties both together behind a small CLI.

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod events;
pub mod exit_codes;
pub mod fs;
pub mod invoke;
pub mod logging;

#[cfg(test)]
mod test_support;
