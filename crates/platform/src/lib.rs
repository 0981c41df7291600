//! Platform abstraction layer for evm.
//!
//! This crate provides a unified interface for platform-specific operations including:
//! - Operating-system family detection (`PlatformPredicate`)
//! - Process execution used by the builder and the recipe repository wrapper
//! - Filesystem helpers returning `evm_errors::Error` with the offending path

pub mod core;
pub mod fs;
pub mod implementations;
pub mod process;

pub use core::{FixedPlatform, HostPlatform, OsFamily, PlatformPredicate};
pub use implementations::host::HostProcessOperations;

/// Re-export commonly used types
pub use fs as filesystem_helpers;
pub use process::{CommandOutput, PlatformCommand, ProcessOperations};
