use anyhow::Result;
use clap::Args;
use config::YamlStore;
use serde_yaml::Value;
use std::path::Path;

use crate::output;
use crate::ux_error;

#[derive(Args)]
pub struct StanzaArgs {
    /// Stanza name, e.g. cluster-definition, region, types
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Replace the stanza with this YAML value before showing it
    #[arg(long, value_name = "YAML")]
    pub set: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool
}

pub fn run(args: StanzaArgs, yaml: &Path) -> Result<()> {
    let new_value = match args.set.as_deref().map(|s| serde_yaml::from_str::<Value>(s)) {
        None => None,
        Some(Ok(value)) => Some(value),
        Some(Err(e)) => {
            ux_error::invalid_yaml_value(&args.name, &e.to_string()).display();
            return Err(e.into());
        }
    };
    let replaced = new_value.is_some();

    let mut store = YamlStore::new(yaml);
    let value = match store.stanza(&args.name, new_value) {
        Ok(value) => value,
        Err(e) => {
            ux_error::config_error(&e, yaml).display();
            return Err(e.into());
        }
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if replaced {
        output::info(&format!("Stanza '{}' written to {}", args.name, yaml.display()));
    }
    print!("{}", serde_yaml::to_string(&value)?);
    Ok(())
}
