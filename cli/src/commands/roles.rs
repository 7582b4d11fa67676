use anyhow::Result;
use clap::Args;
use config::YamlStore;
use config::schema::{DEFAULTS_ROLE, ROLE_DEFINITIONS};
use serde_yaml::Value;
use std::path::Path;

use crate::output;
use crate::ux_error;

#[derive(Args)]
pub struct RolesArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool
}

pub fn run(args: RolesArgs, yaml: &Path) -> Result<()> {
    let mut store = YamlStore::new(yaml);
    let loaded = store
        .validate_role_definitions()
        .and_then(|roles| Ok((roles, store.get_stanza(ROLE_DEFINITIONS)?)));
    let (roles, definitions) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            ux_error::config_error(&e, yaml).display();
            return Err(e.into());
        }
    };

    if args.json {
        let output: Vec<_> = roles
            .iter()
            .map(|role| {
                serde_json::json!({
                    "role": role,
                    "template": role == DEFAULTS_ROLE,
                    "definition": definitions.get(role.as_str())
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("Role Definitions");
    println!();
    for role in &roles {
        let definition = definitions.get(role.as_str());
        output::field(role, &describe(definition));
    }
    println!();
    output::success(&format!("{} roles defined", roles.len()));
    Ok(())
}

fn describe(definition: Option<&Value>) -> String {
    let Some(attributes) = definition.and_then(Value::as_mapping) else {
        return "(no attributes)".to_string();
    };
    attributes
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let value = match v {
                Value::String(s) => s.clone(),
                other => serde_yaml::to_string(other)
                    .map(|s| s.trim_end().to_string())
                    .unwrap_or_default()
            };
            format!("{}={}", k.as_str().unwrap_or("?"), value)
        })
        .collect::<Vec<_>>()
        .join(" ")
}
