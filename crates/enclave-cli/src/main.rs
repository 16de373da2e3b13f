//! Enclave CLI
//!
//! Command-line surface of the provisioning core.
//!
//! # Usage
//!
//! ```bash
//! enclave validate
//! enclave allocate --client client-c --block 10.2.0.0/16 --region us-east-1 --env prod
//! enclave derive --block 10.0.0.0/16 --zones az1,az2
//! enclave name --client client-a --env prod --region us-east-1 --kind vpc
//! enclave tags --clients clients.toml --client client-a --set CostCenter=cc-9
//! enclave layers check --layer platform --env prod --clients clients.toml --outputs outputs.json
//! ```

use clap::{Parser, Subcommand};

mod commands;
mod output;

use output::OutputFormat;

#[derive(Parser)]
#[command(name = "enclave")]
#[command(version = "0.1.0")]
#[command(about = "Per-client network allocation and provisioning core", long_about = None)]
struct Cli {
    /// Output format
    #[arg(long, short, default_value = "table")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the allocation registry; non-zero exit on any violation
    Validate {
        /// Registry ledger path
        #[arg(long, default_value = enclave_registry::store::DEFAULT_REGISTRY_PATH)]
        registry: String,
    },
    /// Allocate a new address block via check-and-insert
    Allocate {
        /// Registry ledger path
        #[arg(long, default_value = enclave_registry::store::DEFAULT_REGISTRY_PATH)]
        registry: String,
        /// Client identifier
        #[arg(long)]
        client: String,
        /// CIDR block to allocate
        #[arg(long)]
        block: String,
        /// Deployment region
        #[arg(long)]
        region: String,
        /// Deployment environment
        #[arg(long, value_name = "ENV")]
        env: String,
        /// Allocation notes
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Derive the per-tier subnet partitioning of one address block
    Derive {
        /// Parent CIDR block
        #[arg(long)]
        block: ipnet::Ipv4Net,
        /// Availability zones, comma separated
        #[arg(long, value_delimiter = ',')]
        zones: Vec<String>,
    },
    /// Build one deterministic resource name
    Name {
        /// Client identifier
        #[arg(long)]
        client: String,
        /// Deployment environment
        #[arg(long, value_name = "ENV")]
        env: String,
        /// Deployment region
        #[arg(long)]
        region: String,
        /// Resource kind token
        #[arg(long)]
        kind: String,
        /// Optional qualifier token
        #[arg(long)]
        qualifier: Option<String>,
    },
    /// Render the canonical tag map for one client
    Tags {
        /// Per-layer client table path
        #[arg(long)]
        clients: String,
        /// Client identifier
        #[arg(long)]
        client: String,
        /// Override tags, KEY=VALUE (may repeat)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        overrides: Vec<String>,
    },
    /// Inspect the layer contract and check apply preconditions
    Layers {
        #[command(subcommand)]
        action: commands::layers::LayerCommands,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Validate { registry } => commands::validate::handle(&registry, cli.format),
        Commands::Allocate {
            registry,
            client,
            block,
            region,
            env,
            notes,
        } => commands::allocate::handle(&registry, &client, &block, &region, &env, &notes),
        Commands::Derive { block, zones } => commands::derive::handle(block, &zones, cli.format),
        Commands::Name {
            client,
            env,
            region,
            kind,
            qualifier,
        } => commands::name::handle(&client, &env, &region, &kind, qualifier.as_deref()),
        Commands::Tags {
            clients,
            client,
            overrides,
        } => commands::tags::handle(&clients, &client, &overrides, cli.format),
        Commands::Layers { action } => commands::layers::handle(action, cli.format),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
