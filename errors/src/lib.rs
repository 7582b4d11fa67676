//! # Handson Errors
//!
//! Error types shared by the configuration store and the cloud connector.
//!
//! - Uses `thiserror` for structured error definitions
//! - Every message names the offending stanza, role or attribute
//! - `ConfigError::category` groups errors into schema, referential,
//!   attribute and I/O violations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Broad class of a configuration failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A stanza or entry has the wrong shape or type.
    Schema,
    /// A role is referenced but undefined, duplicated or reserved.
    Referential,
    /// A role definition carries an unknown attribute or instance type.
    Attribute,
    /// The backing file could not be read, parsed or written.
    Io
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Schema => "schema",
            ErrorCategory::Referential => "referential",
            ErrorCategory::Attribute => "attribute",
            ErrorCategory::Io => "io"
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration store errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("YAML file name not initialized")]
    FileNameNotInitialized,

    #[error("YAML file name already set to {current:?}, refusing {requested:?}")]
    FileNameConflict { current: PathBuf, requested: PathBuf },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error
    },

    #[error("Failed to parse YAML file {path:?}: {reason}")]
    YamlParse { path: PathBuf, reason: String },

    #[error("Failed to serialize YAML tree: {reason}")]
    YamlSerialize { reason: String },

    #[error("YAML file {path:?} is not a mapping")]
    NotAMapping { path: PathBuf },

    #[error("YAML stanza '{stanza}' not permitted")]
    StanzaNotPermitted { stanza: String },

    #[error("YAML stanza '{stanza}' is malformed (should be a {expected}, found {found})")]
    MalformedStanza {
        stanza: String,
        expected: String,
        found: String
    },

    #[error("Role definition '{role}' is not a mapping")]
    RoleDefinitionNotMapping { role: String },

    #[error("Role definition '{role}' contains illegal attribute '{attribute}'")]
    IllegalRoleAttribute { role: String, attribute: String },

    #[error("Illegal type {instance_type} detected in role definition '{role}'")]
    IllegalInstanceType { role: String, instance_type: String },

    #[error("cluster-definition stanza is not a collection")]
    ClusterDefinitionNotSequence,

    #[error("Instance definition {definition} is not a mapping")]
    InstanceDefinitionNotMapping { definition: String },

    #[error("Instance definition is empty")]
    EmptyInstanceDefinition,

    #[error("Instance definition {definition} contains more than one attribute")]
    TooManyInstanceAttributes { definition: String },

    #[error("Instance definition key '{key}' is not 'role'")]
    InstanceKeyNotRole { key: String },

    #[error("Detected missing 'role' attribute")]
    MissingRole,

    #[error("Detected non-string 'role' attribute of type {found}")]
    NonStringRole { found: String },

    #[error("Detected empty 'role' attribute")]
    EmptyRole,

    #[error("Detected duplicate role '{role}' in cluster definition")]
    DuplicateRole { role: String },

    #[error("Detected bogus role '{role}' in cluster definition")]
    ReservedRole { role: String },

    #[error("Role '{role}' is undefined")]
    UndefinedRole { role: String }
}

impl ConfigError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConfigError::FileNameNotInitialized
            | ConfigError::FileNameConflict { .. }
            | ConfigError::Io { .. }
            | ConfigError::YamlParse { .. }
            | ConfigError::YamlSerialize { .. }
            | ConfigError::NotAMapping { .. } => ErrorCategory::Io,

            ConfigError::StanzaNotPermitted { .. }
            | ConfigError::MalformedStanza { .. }
            | ConfigError::RoleDefinitionNotMapping { .. }
            | ConfigError::ClusterDefinitionNotSequence
            | ConfigError::InstanceDefinitionNotMapping { .. }
            | ConfigError::EmptyInstanceDefinition
            | ConfigError::TooManyInstanceAttributes { .. }
            | ConfigError::InstanceKeyNotRole { .. }
            | ConfigError::MissingRole
            | ConfigError::NonStringRole { .. }
            | ConfigError::EmptyRole => ErrorCategory::Schema,

            ConfigError::DuplicateRole { .. }
            | ConfigError::ReservedRole { .. }
            | ConfigError::UndefinedRole { .. } => ErrorCategory::Referential,

            ConfigError::IllegalRoleAttribute { .. } | ConfigError::IllegalInstanceType { .. } => {
                ErrorCategory::Attribute
            }
        }
    }
}

/// Cloud connection errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Failed to connect to {region} ({kind})")]
    ConnectFailed { kind: String, region: String },

    #[error("No region configured for {kind} connection")]
    MissingRegion { kind: String },

    #[error("{operation} request to {region} failed: {reason}")]
    RequestFailed {
        operation: String,
        region: String,
        reason: String
    }
}
