use anyhow::Result;
use clap::Args;
use config::YamlStore;
use config::schema::ROLE_DEFINITIONS;
use serde_yaml::Value;
use std::path::Path;

use crate::output;
use crate::ux_error;

#[derive(Args)]
pub struct ClusterArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool
}

pub fn run(args: ClusterArgs, yaml: &Path) -> Result<()> {
    let mut store = YamlStore::new(yaml);
    let loaded = store
        .validate_cluster_definition()
        .and_then(|roles| Ok((roles, store.get_stanza(ROLE_DEFINITIONS)?)));
    let (roles, definitions) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            ux_error::config_error(&e, yaml).display();
            return Err(e.into());
        }
    };

    let last_octet = |role: &str| {
        definitions
            .get(role)
            .and_then(|d| d.get("last-octet"))
            .and_then(Value::as_u64)
    };

    if args.json {
        let output: Vec<_> = roles
            .iter()
            .enumerate()
            .map(|(i, role)| {
                serde_json::json!({
                    "node": i + 1,
                    "role": role,
                    "last_octet": last_octet(role)
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("Cluster Definition");
    println!();
    for (i, role) in roles.iter().enumerate() {
        let octet = last_octet(role).map_or_else(|| "-".to_string(), |o| o.to_string());
        println!("  {}. {} (last octet {})", i + 1, role, octet);
    }
    println!();
    output::success(&format!("{} instances in cluster", roles.len()));
    Ok(())
}
