pub mod cluster;
pub mod completion;
pub mod probe;
pub mod roles;
pub mod stanza;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "handson",
    author,
    version,
    about = "Handson - ad-hoc Ceph clusters on EC2",
    long_about = "Provision AWS EC2 instances for ad-hoc Ceph clusters.\n\nCluster layout, roles and \
                  AWS settings live in a single YAML file. Missing sections are filled in with \
                  defaults on first use."
)]
pub struct Cli {
    /// YAML file holding the cluster configuration
    #[arg(
        long,
        global = true,
        env = "HANDSON_YAML",
        default_value = "./aws.yaml",
        value_name = "PATH"
    )]
    pub yaml: PathBuf,

    #[command(subcommand)]
    pub command: Commands
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(subcommand, about = "Probe the YAML tree or the AWS connection")]
    Probe(probe::ProbeCommand),

    #[command(about = "Show or replace a YAML stanza")]
    Stanza(stanza::StanzaArgs),

    #[command(about = "Validate and list role definitions")]
    Roles(roles::RolesArgs),

    #[command(about = "Validate and list the cluster definition")]
    Cluster(cluster::ClusterArgs),

    #[command(about = "Generate shell completions")]
    Completion(completion::CompletionArgs)
}
