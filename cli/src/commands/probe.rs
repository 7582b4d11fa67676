//! Probe command - fail-fast startup checks
//!
//! - `probe yaml` loads the YAML file, applies defaults and validates every
//!   stanza, including role and cluster definitions
//! - `probe aws` opens the EC2 connection for the configured region and
//!   makes one request to confirm it works

use anyhow::Result;
use clap::{Args, Subcommand};
use config::{STANZAS, YamlStore};
use errors::ConnectionError;
use instances::{AwsConnector, ConnectionKind, Instances};
use std::path::Path;

use crate::output;
use crate::ux_error;

#[derive(Subcommand)]
pub enum ProbeCommand {
    #[command(about = "Validate every stanza of the YAML file")]
    Yaml(ProbeYamlArgs),

    #[command(about = "Connect to EC2 in the configured region")]
    Aws(ProbeAwsArgs)
}

#[derive(Args)]
pub struct ProbeYamlArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool
}

#[derive(Args)]
pub struct ProbeAwsArgs {
    /// Override the EC2 endpoint URL (for local AWS emulators)
    #[arg(long, env = "HANDSON_EC2_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool
}

pub async fn run(cmd: ProbeCommand, yaml: &Path) -> Result<()> {
    match cmd {
        ProbeCommand::Yaml(args) => run_yaml(args, yaml),
        ProbeCommand::Aws(args) => run_aws(args, yaml).await
    }
}

fn run_yaml(args: ProbeYamlArgs, yaml: &Path) -> Result<()> {
    let mut store = YamlStore::new(yaml);
    if let Err(e) = store.probe_all() {
        ux_error::config_error(&e, yaml).display();
        return Err(e.into());
    }

    let stanzas: Vec<&str> = STANZAS.iter().map(|s| s.name).collect();
    if args.json {
        let output = serde_json::json!({
            "file": yaml.display().to_string(),
            "sane": true,
            "stanzas": stanzas
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("YAML Probe");
    println!();
    output::field("File", &yaml.display().to_string());
    output::field("Stanzas", &stanzas.join(", "));
    println!();
    output::success("YAML tree is sane");
    Ok(())
}

async fn run_aws(args: ProbeAwsArgs, yaml: &Path) -> Result<()> {
    let mut store = YamlStore::new(yaml);
    let region = match store.region_str() {
        Ok(Some(region)) => region,
        Ok(None) => {
            let e = ConnectionError::MissingRegion {
                kind: ConnectionKind::Ec2.to_string()
            };
            ux_error::connection_error(&e).display();
            return Err(e.into());
        }
        Err(e) => {
            ux_error::config_error(&e, yaml).display();
            return Err(e.into());
        }
    };

    let connector = match args.endpoint {
        Some(endpoint) => AwsConnector::with_endpoint(endpoint),
        None => AwsConnector::new()
    };
    let mut instances = Instances::new(connector, region);

    let connected = instances.ec2().await;
    let regions = match connected {
        Ok(client) => instances::aws::region_names(&client, instances.region()).await,
        Err(e) => Err(e)
    };
    let regions = match regions {
        Ok(regions) => regions,
        Err(e) => {
            ux_error::connection_error(&e).display();
            return Err(e.into());
        }
    };
    let region = instances.region();

    if args.json {
        let output = serde_json::json!({
            "region": region,
            "connected": true,
            "regions": regions
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("AWS Probe");
    println!();
    output::field("Region", region);
    output::field("Visible regions", &regions.len().to_string());
    println!();
    if !regions.iter().any(|r| r == region) {
        output::hint(&format!("{} is not among the regions EC2 reports", region));
    }
    output::success(&format!("Connected to EC2 in {}", region));
    Ok(())
}
