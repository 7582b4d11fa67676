//! # Stanza Schema
//!
//! The fixed table of recognized top-level stanzas. Each entry pairs a stanza
//! name with the container type its value must have and a constructor for
//! its default value.

use serde_yaml::{Mapping, Number, Value};
use std::fmt;

pub const CLUSTER_DEFINITION: &str = "cluster-definition";
pub const CLUSTERS: &str = "clusters";
pub const DELEGATES: &str = "delegates";
pub const KEYNAME: &str = "keyname";
pub const KEYPAIRS: &str = "keypairs";
pub const NAMETAG: &str = "nametag";
pub const REGION: &str = "region";
pub const ROLE_DEFINITIONS: &str = "role-definitions";
pub const SUBNETS: &str = "subnets";
pub const TYPES: &str = "types";
pub const VPC: &str = "vpc";

/// Role-definitions entry that doubles as the attribute template.
pub const DEFAULTS_ROLE: &str = "defaults";

/// Expected container type of a stanza value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StanzaKind {
    Sequence,
    Mapping,
    Integer,
    String
}

impl StanzaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StanzaKind::Sequence => "sequence",
            StanzaKind::Mapping => "mapping",
            StanzaKind::Integer => "integer",
            StanzaKind::String => "string"
        }
    }

    /// Whether `value` has this container type. Floats and booleans are not
    /// integers.
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (StanzaKind::Sequence, Value::Sequence(_)) => true,
            (StanzaKind::Mapping, Value::Mapping(_)) => true,
            (StanzaKind::Integer, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (StanzaKind::String, Value::String(_)) => true,
            _ => false
        }
    }
}

impl fmt::Display for StanzaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the schema table.
#[derive(Debug)]
pub struct StanzaSpec {
    pub name: &'static str,
    pub kind: StanzaKind,
    default: fn() -> Value
}

impl StanzaSpec {
    pub fn default_value(&self) -> Value {
        (self.default)()
    }
}

/// Every recognized stanza, in alphabetical order.
pub static STANZAS: &[StanzaSpec] = &[
    StanzaSpec {
        name: CLUSTER_DEFINITION,
        kind: StanzaKind::Sequence,
        default: default_cluster_definition
    },
    StanzaSpec {
        name: CLUSTERS,
        kind: StanzaKind::Mapping,
        default: empty_mapping
    },
    StanzaSpec {
        name: DELEGATES,
        kind: StanzaKind::Integer,
        default: default_delegates
    },
    StanzaSpec {
        name: KEYNAME,
        kind: StanzaKind::String,
        default: default_keyname
    },
    StanzaSpec {
        name: KEYPAIRS,
        kind: StanzaKind::Mapping,
        default: empty_mapping
    },
    StanzaSpec {
        name: NAMETAG,
        kind: StanzaKind::String,
        default: default_nametag
    },
    StanzaSpec {
        name: REGION,
        kind: StanzaKind::Mapping,
        default: default_region
    },
    StanzaSpec {
        name: ROLE_DEFINITIONS,
        kind: StanzaKind::Mapping,
        default: default_role_definitions
    },
    StanzaSpec {
        name: SUBNETS,
        kind: StanzaKind::Mapping,
        default: empty_mapping
    },
    StanzaSpec {
        name: TYPES,
        kind: StanzaKind::Sequence,
        default: default_types
    },
    StanzaSpec {
        name: VPC,
        kind: StanzaKind::Mapping,
        default: empty_mapping
    },
];

/// Look up a stanza by name.
pub fn lookup(name: &str) -> Option<&'static StanzaSpec> {
    STANZAS.iter().find(|spec| spec.name == name)
}

pub fn is_permitted(name: &str) -> bool {
    lookup(name).is_some()
}

/// Legal role attribute keys: the keys of the `defaults` template entry of
/// the built-in role definitions.
pub fn role_attribute_keys() -> Vec<String> {
    let defaults = default_role_definitions();
    defaults
        .get(DEFAULTS_ROLE)
        .and_then(Value::as_mapping)
        .map(|template| {
            template
                .keys()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn empty_mapping() -> Value {
    Value::Mapping(Mapping::new())
}

fn int(n: i64) -> Value {
    Value::Number(Number::from(n))
}

fn str_value(s: &str) -> Value {
    Value::String(s.to_string())
}

fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Value {
    Value::Mapping(
        entries
            .into_iter()
            .map(|(k, v)| (str_value(k), v))
            .collect()
    )
}

fn default_cluster_definition() -> Value {
    Value::Sequence(vec![mapping([("role", str_value("admin"))])])
}

fn default_delegates() -> Value {
    int(1)
}

fn default_keyname() -> Value {
    Value::String(crate::user::logged_user())
}

fn default_nametag() -> Value {
    str_value("handson")
}

fn default_region() -> Value {
    mapping([
        ("region_str", str_value("eu-west-1")),
        ("availability_zone", Value::Null),
    ])
}

fn default_role_definitions() -> Value {
    mapping([
        ("admin", mapping([("last-octet", int(10))])),
        (
            DEFAULTS_ROLE,
            mapping([
                ("ami-id", Value::Null),
                ("last-octet", Value::Null),
                ("node-no", Value::Null),
                ("replace-from-environment", Value::Sequence(Vec::new())),
                ("type", str_value("t2.small")),
                ("user-data", Value::Null),
                ("volume", Value::Null),
            ])
        ),
        ("master", mapping([("last-octet", int(10))])),
        ("mon1", mapping([("last-octet", int(11))])),
        ("mon2", mapping([("last-octet", int(12))])),
        ("mon3", mapping([("last-octet", int(13))])),
        ("osd", mapping([("last-octet", int(14))])),
        ("windows", mapping([("last-octet", int(15))])),
    ])
}

fn default_types() -> Value {
    Value::Sequence(vec![
        str_value("t2.micro"),
        str_value("t2.small"),
        str_value("t2.medium"),
    ])
}

/// Short type name of a YAML value, for error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value"
    }
}
