//! Shared test fixtures for the handson workspace.
//!
//! Provides scratch YAML documents in private temporary directories, plus a
//! few canned documents used across the CLI tests. Each fixture removes its
//! directory when dropped.

mod fixtures;

pub use fixtures::*;
