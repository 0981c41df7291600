//! Concrete platform implementations

pub mod host;
