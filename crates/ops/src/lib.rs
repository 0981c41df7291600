#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! High-level operations for evm
//!
//! This crate sits between the CLI and the package lifecycle. Each operation
//! validates the request (is the package installed? is anything current?),
//! drives the lifecycle in `evm-package`, and returns a serialisable report.

mod context;
mod lifecycle;
mod query;
mod recipes;
mod settings;
mod types;

pub use context::{OpsContextBuilder, OpsCtx};
pub use lifecycle::{disuse, install, uninstall, use_package};
pub use query::{bin, doctor, list_packages};
pub use recipes::{ensure_recipes, update_recipes};
pub use settings::{config_get, config_set};
pub use types::{InstallRequest, OperationResult};
