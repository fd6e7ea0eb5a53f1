//! Tattletale invocation.
//!
//! Builds the `java -jar` command line for the analyzer, runs it in the
//! workspace, and streams its output to a [`LineSink`]:
//!
//! - Paths are passed as separate arguments, never through a shell
//! - stdout and stderr are forwarded line by line as they arrive
//! - A [`CancelToken`] (flag or deadline) kills the child and reports
//!   [`ErrorKind::Interrupted`]
//! - No retries; one call is one process

mod cancel;
mod executor;
mod request;
mod result;
mod sink;

#[cfg(test)]
mod tests;

pub use cancel::CancelToken;
pub use executor::{DEFAULT_POLL_INTERVAL, Invoker};
pub use request::{DEFAULT_RUNTIME, InvocationRequest, PROPERTIES_SYSTEM_PROPERTY};
pub use result::{ErrorKind, InvocationResult};
pub use sink::{LineSink, WriterSink};
