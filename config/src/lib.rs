//! # Handson Configuration Store
//!
//! Schema-validated YAML configuration for provisioning ad-hoc Ceph clusters
//! on EC2.
//!
//! This crate provides:
//! - The fixed table of recognized stanzas with defaults and expected types
//! - Lazy loading of a single YAML file into an explicit `YamlStore`
//! - Default application with write-back to disk
//! - Role definition and cluster definition validation
//!
//! All failures are returned as `errors::ConfigError`.

pub mod file_loader;
pub mod schema;
pub mod store;
pub mod user;
pub mod validator;

pub use errors::{ConfigError, ErrorCategory};
pub use schema::{STANZAS, StanzaKind, StanzaSpec};
pub use store::YamlStore;
pub use user::logged_user;
pub use validator::{instance_role, validate_role_definition};
