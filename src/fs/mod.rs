//! Filesystem utilities for tattle.
//!
//! Atomic writes for configuration and a filtered recursive copy for
//! archiving reports.

pub mod atomic;
mod copy_tree;

pub use atomic::atomic_write;
pub use atomic::atomic_write_file;
pub use copy_tree::{CopyError, build_includes, copy_tree};
