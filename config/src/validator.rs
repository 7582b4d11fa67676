//! # Role and Cluster Validation
//!
//! Semantic checks on top of the per-stanza type checks:
//!
//! - Role definitions only use attributes of the `defaults` template and
//!   only name instance types listed in the `types` stanza
//! - The cluster definition is a list of `{role: <name>}` entries naming
//!   distinct, defined, non-reserved roles

use crate::schema::{self, CLUSTER_DEFINITION, DEFAULTS_ROLE, ROLE_DEFINITIONS, STANZAS, TYPES};
use crate::store::YamlStore;
use errors::ConfigError;
use serde_yaml::{Mapping, Value};
use tracing::{debug, info, warn};

impl YamlStore {
    /// Fetch every stanza and run the semantic checks.
    ///
    /// Stops at the first failure.
    pub fn probe_all(&mut self) -> Result<(), ConfigError> {
        for spec in STANZAS {
            info!("Probing {:?} stanza", spec.name);
            self.get_stanza(spec.name)?;
            match spec.name {
                CLUSTER_DEFINITION => {
                    self.validate_cluster_definition()?;
                }
                ROLE_DEFINITIONS => {
                    self.validate_role_definitions()?;
                }
                _ => {}
            }
        }
        info!("YAML tree is sane");
        Ok(())
    }

    /// Validate every entry of the role-definitions stanza.
    ///
    /// Returns the names of all detected roles, in document order. Entries
    /// whose value is null are listed but not checked.
    pub fn validate_role_definitions(&mut self) -> Result<Vec<String>, ConfigError> {
        let role_defs = self.get_stanza(ROLE_DEFINITIONS)?;
        let attribute_keys = schema::role_attribute_keys();

        let mut roles = Vec::new();
        for (role, definition) in role_defs.as_mapping().into_iter().flatten() {
            let role = display_value(role);
            debug!("Detected definition stanza of role {:?}", role);
            if definition.is_null() {
                roles.push(role);
                continue;
            }
            validate_role_definition(&role, definition, &attribute_keys, || {
                self.get_stanza(TYPES)
            })?;
            roles.push(role);
        }
        info!("Detected roles {:?}", roles);
        Ok(roles)
    }

    /// Whether `role` is a key of the role-definitions stanza.
    ///
    /// Never fails: an unreadable stanza counts as "no such role".
    pub fn role_exists(&mut self, role: &str) -> bool {
        match self.get_stanza(ROLE_DEFINITIONS) {
            Ok(role_defs) => role_defs
                .as_mapping()
                .is_some_and(|defs| defs.contains_key(role)),
            Err(e) => {
                warn!("Cannot read role definitions: {}", e);
                false
            }
        }
    }

    /// Validate the cluster-definition stanza.
    ///
    /// Returns the roles in cluster order.
    pub fn validate_cluster_definition(&mut self) -> Result<Vec<String>, ConfigError> {
        let cluster_def = self.get_stanza(CLUSTER_DEFINITION)?;
        let entries = cluster_def
            .as_sequence()
            .ok_or(ConfigError::ClusterDefinitionNotSequence)?;
        info!("Detected cluster-definition stanza");

        // A malformed role-definitions stanza must surface as such, not as an
        // undefined role.
        let role_defs = self.get_stanza(ROLE_DEFINITIONS)?;
        let defined = role_defs.as_mapping();

        let mut roles: Vec<String> = Vec::new();
        for entry in entries {
            debug!("Considering instance definition {:?}", entry);
            let role = instance_role(entry)?;
            if roles.iter().any(|seen| *seen == role) {
                return Err(ConfigError::DuplicateRole { role });
            }
            if role.eq_ignore_ascii_case(DEFAULTS_ROLE) {
                return Err(ConfigError::ReservedRole { role });
            }
            info!("Detected role {:?} in cluster definition", role);
            if !defined.is_some_and(|defs| defs.contains_key(role.as_str())) {
                return Err(ConfigError::UndefinedRole { role });
            }
            roles.push(role);
        }
        Ok(roles)
    }
}

/// Check one role definition against the attribute template and the
/// instance type allowlist.
///
/// `allowed_types` is only called when the definition has a `type`
/// attribute.
pub fn validate_role_definition<F>(
    role: &str,
    definition: &Value,
    attribute_keys: &[String],
    mut allowed_types: F,
) -> Result<(), ConfigError>
where
    F: FnMut() -> Result<Value, ConfigError>
{
    let attributes = definition
        .as_mapping()
        .ok_or_else(|| ConfigError::RoleDefinitionNotMapping {
            role: role.to_string()
        })?;

    for (key, value) in attributes {
        debug!("Considering attribute {:?}", key);
        let attribute = key
            .as_str()
            .filter(|k| attribute_keys.iter().any(|a| a.as_str() == *k));
        let Some(attribute) = attribute else {
            return Err(ConfigError::IllegalRoleAttribute {
                role: role.to_string(),
                attribute: display_value(key)
            });
        };
        if attribute != "type" {
            continue;
        }
        let types = allowed_types()?;
        if !types.as_sequence().is_some_and(|t| t.contains(value)) {
            return Err(ConfigError::IllegalInstanceType {
                role: role.to_string(),
                instance_type: display_value(value)
            });
        }
    }
    Ok(())
}

/// Extract the role name from a single `{role: <name>}` instance definition.
pub fn instance_role(entry: &Value) -> Result<String, ConfigError> {
    let mapping: &Mapping = entry.as_mapping().ok_or_else(|| {
        ConfigError::InstanceDefinitionNotMapping {
            definition: display_value(entry)
        }
    })?;

    let mut attributes = mapping.iter();
    let (key, value) = match (attributes.next(), attributes.next()) {
        (None, _) => return Err(ConfigError::EmptyInstanceDefinition),
        (Some(pair), None) => pair,
        (Some(_), Some(_)) => {
            return Err(ConfigError::TooManyInstanceAttributes {
                definition: display_value(entry)
            });
        }
    };

    if key.as_str() != Some("role") {
        return Err(ConfigError::InstanceKeyNotRole {
            key: display_value(key)
        });
    }

    match value {
        Value::Null => Err(ConfigError::MissingRole),
        Value::String(role) if role.is_empty() => Err(ConfigError::EmptyRole),
        Value::String(role) => Ok(role.clone()),
        other => Err(ConfigError::NonStringRole {
            found: schema::type_name(other).to_string()
        })
    }
}

/// Render a YAML value on one line for messages.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().replace('\n', " "))
            .unwrap_or_else(|_| format!("{:?}", other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn store_with(yaml: &str) -> (TempDir, YamlStore) {
        let dir = TempDir::new().unwrap();
        let path: PathBuf = dir.path().join("aws.yaml");
        fs::write(&path, yaml).unwrap();
        (dir, YamlStore::new(path))
    }

    #[test]
    #[serial]
    fn test_probe_defaults() {
        let (_dir, mut store) = store_with("");
        store.probe_all().unwrap();
    }

    #[test]
    fn test_admin_cluster_validates() {
        let (_dir, mut store) = store_with("cluster-definition:\n  - role: admin\n");
        assert_eq!(store.validate_cluster_definition().unwrap(), vec!["admin"]);
    }

    #[test]
    fn test_cluster_order_is_kept() {
        let (_dir, mut store) = store_with(
            "cluster-definition:\n  - role: admin\n  - role: mon1\n  - role: osd\n"
        );
        assert_eq!(
            store.validate_cluster_definition().unwrap(),
            vec!["admin", "mon1", "osd"]
        );
    }

    #[test]
    fn test_duplicate_role() {
        let (_dir, mut store) =
            store_with("cluster-definition:\n  - role: mon1\n  - role: mon1\n");
        assert!(matches!(
            store.validate_cluster_definition(),
            Err(ConfigError::DuplicateRole { ref role }) if role == "mon1"
        ));
    }

    #[test]
    fn test_reserved_role_any_case() {
        for name in ["defaults", "Defaults", "DEFAULTS"] {
            let yaml = format!("cluster-definition:\n  - role: {}\n", name);
            let (_dir, mut store) = store_with(&yaml);
            assert!(matches!(
                store.validate_cluster_definition(),
                Err(ConfigError::ReservedRole { .. })
            ));
        }
    }

    #[test]
    fn test_undefined_role() {
        let (_dir, mut store) = store_with("cluster-definition:\n  - role: gateway\n");
        assert!(matches!(
            store.validate_cluster_definition(),
            Err(ConfigError::UndefinedRole { ref role }) if role == "gateway"
        ));
    }

    #[test]
    fn test_cluster_definition_must_be_sequence() {
        let (_dir, mut store) = store_with("cluster-definition: {role: admin}\n");
        // rejected by the stanza type check before the semantic check runs
        assert!(matches!(
            store.validate_cluster_definition(),
            Err(ConfigError::MalformedStanza { .. })
        ));
    }

    #[test]
    fn test_instance_role_shapes() {
        let parse = |s: &str| serde_yaml::from_str::<Value>(s).unwrap();

        assert_eq!(instance_role(&parse("{role: osd}")).unwrap(), "osd");
        assert!(matches!(
            instance_role(&parse("osd")),
            Err(ConfigError::InstanceDefinitionNotMapping { .. })
        ));
        assert!(matches!(
            instance_role(&parse("{}")),
            Err(ConfigError::EmptyInstanceDefinition)
        ));
        assert!(matches!(
            instance_role(&parse("{role: osd, count: 2}")),
            Err(ConfigError::TooManyInstanceAttributes { .. })
        ));
        assert!(matches!(
            instance_role(&parse("{name: osd}")),
            Err(ConfigError::InstanceKeyNotRole { ref key }) if key == "name"
        ));
        assert!(matches!(
            instance_role(&parse("{role: ~}")),
            Err(ConfigError::MissingRole)
        ));
        assert!(matches!(
            instance_role(&parse("{role: 3}")),
            Err(ConfigError::NonStringRole { ref found }) if found == "integer"
        ));
        assert!(matches!(
            instance_role(&parse("{role: ''}")),
            Err(ConfigError::EmptyRole)
        ));
    }

    #[test]
    fn test_role_exists() {
        let (_dir, mut store) = store_with("");
        assert!(store.role_exists("admin"));
        assert!(store.role_exists("defaults"));
        assert!(!store.role_exists("gateway"));
    }

    #[test]
    fn test_role_exists_never_fails() {
        let (_dir, mut store) = store_with("role-definitions: [admin]\n");
        assert!(!store.role_exists("admin"));
    }

    #[test]
    fn test_default_roles_validate() {
        let (_dir, mut store) = store_with("");
        let roles = store.validate_role_definitions().unwrap();
        assert_eq!(
            roles,
            vec!["admin", "defaults", "master", "mon1", "mon2", "mon3", "osd", "windows"]
        );
    }

    #[test]
    fn test_unknown_role_attribute() {
        let (_dir, mut store) = store_with("role-definitions:\n  osd:\n    bogus: 1\n");
        assert!(matches!(
            store.validate_role_definitions(),
            Err(ConfigError::IllegalRoleAttribute { ref role, ref attribute })
                if role == "osd" && attribute == "bogus"
        ));
    }

    #[test]
    fn test_instance_type_allowlist() {
        let (_dir, mut store) = store_with("role-definitions:\n  osd:\n    type: t2.large\n");
        assert!(matches!(
            store.validate_role_definitions(),
            Err(ConfigError::IllegalInstanceType { ref instance_type, .. })
                if instance_type == "t2.large"
        ));

        let (_dir, mut store) = store_with(
            "types: [t2.small, t2.large]\nrole-definitions:\n  osd:\n    type: t2.large\n"
        );
        assert_eq!(store.validate_role_definitions().unwrap(), vec!["osd"]);
    }

    #[test]
    fn test_role_definition_not_mapping() {
        let (_dir, mut store) = store_with("role-definitions:\n  osd: [a, b]\n");
        assert!(matches!(
            store.validate_role_definitions(),
            Err(ConfigError::RoleDefinitionNotMapping { ref role }) if role == "osd"
        ));
    }

    // Suspect leniency: a null role definition is accepted without checks.
    #[test]
    fn test_null_role_definition_is_skipped() {
        let (_dir, mut store) = store_with("role-definitions:\n  admin: ~\n  osd: {last-octet: 14}\n");
        assert_eq!(
            store.validate_role_definitions().unwrap(),
            vec!["admin", "osd"]
        );
    }

    #[test]
    fn test_cluster_check_reports_malformed_role_definitions() {
        let (_dir, mut store) =
            store_with("cluster-definition:\n  - role: admin\nrole-definitions: [admin]\n");
        assert!(matches!(
            store.validate_cluster_definition(),
            Err(ConfigError::MalformedStanza { ref stanza, .. }) if stanza == ROLE_DEFINITIONS
        ));
        assert!(matches!(
            store.probe_all(),
            Err(ConfigError::MalformedStanza { ref stanza, .. }) if stanza == ROLE_DEFINITIONS
        ));
    }

    #[test]
    fn test_types_only_read_for_type_attribute() {
        let (_dir, mut store) =
            store_with("types: t2.micro\nrole-definitions:\n  osd: {last-octet: 14}\n");
        assert_eq!(store.validate_role_definitions().unwrap(), vec!["osd"]);

        // no type attribute, so no types default is written back
        let (dir, mut store) = store_with("role-definitions:\n  osd: {last-octet: 14}\n");
        store.validate_role_definitions().unwrap();
        let written = fs::read_to_string(dir.path().join("aws.yaml")).unwrap();
        assert!(!written.contains("types"));

        let (_dir, mut store) =
            store_with("types: t2.micro\nrole-definitions:\n  osd: {bogus: 1}\n");
        assert!(matches!(
            store.validate_role_definitions(),
            Err(ConfigError::IllegalRoleAttribute { ref attribute, .. }) if attribute == "bogus"
        ));

        let (_dir, mut store) =
            store_with("types: t2.micro\nrole-definitions:\n  osd: {type: t2.micro}\n");
        assert!(matches!(
            store.validate_role_definitions(),
            Err(ConfigError::MalformedStanza { ref stanza, .. }) if stanza == TYPES
        ));
    }

    #[test]
    fn test_probe_stops_at_first_failure() {
        let (_dir, mut store) = store_with(
            "cluster-definition:\n  - role: gateway\nrole-definitions:\n  osd: {bogus: 1}\n"
        );
        assert!(matches!(
            store.probe_all(),
            Err(ConfigError::UndefinedRole { .. })
        ));
    }
}
