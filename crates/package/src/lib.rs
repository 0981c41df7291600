#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package lifecycle for evm
//!
//! A [`Package`] is one named, installable, activatable version of Emacs. It
//! owns no state of its own: whether it is installed is read from its
//! installation directory, and whether it is active is read from the
//! persisted `current` setting on every query. Transitions coordinate three
//! independent resources without a transaction:
//!
//! - the installation tree under the base directory
//! - the two shims (`primary` is only ever created when absent, `managed` is
//!   always rewritten)
//! - the `current` setting
//!
//! Each operation runs its steps strictly in order and stops at the first
//! failure; nothing is rolled back and every step is safe to repeat.

mod context;
mod package;
pub mod reconcile;
pub mod shim;

pub use context::{Layout, PackageCtx};
pub use package::{deactivate, Package};
pub use reconcile::doctor;
pub use shim::{parse_shim_target, shim_script, FsShimWriter, MemoryShimWriter, ShimState, ShimWriter};
