//! JSON/CLI configuration for the bundled binaries.

pub mod classify;
