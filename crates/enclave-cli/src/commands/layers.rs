//! `enclave layers` - contract inspection and precondition checks

use crate::output::OutputFormat;
use anyhow::Context;
use clap::Subcommand;
use colored::Colorize;
use enclave_common::{ClientId, Environment};
use enclave_layers::{check_preconditions, contract, Layer, LayerError, LayerOutput, LayerOutputStore};

#[derive(Subcommand)]
pub enum LayerCommands {
    /// Print the six layers in apply order
    Sequence,
    /// Show what a layer reads and publishes
    Contract {
        /// Layer name (kebab-case)
        layer: Layer,
    },
    /// Check a layer's apply precondition against published outputs
    Check {
        /// Layer to check
        #[arg(long)]
        layer: Layer,
        /// Environment to check against
        #[arg(long, value_name = "ENV")]
        env: String,
        /// Per-layer client table path
        #[arg(long)]
        clients: String,
        /// JSON snapshot of published layer outputs
        #[arg(long)]
        outputs: String,
    },
}

pub fn handle(action: LayerCommands, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        LayerCommands::Sequence => {
            for layer in Layer::all() {
                println!("{layer}");
            }
        }
        LayerCommands::Contract { layer } => {
            let c = contract(layer);
            println!("{layer} requires:");
            for req in c.requires {
                println!("  from {}: {}", req.layer, req.keys.join(", "));
            }
            println!("{layer} publishes: {}", c.publishes.join(", "));
        }
        LayerCommands::Check {
            layer,
            env,
            clients,
            outputs,
        } => check(layer, &env, &clients, &outputs, format)?,
    }
    Ok(())
}

fn check(
    layer: Layer,
    env: &str,
    clients_path: &str,
    outputs_path: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let environment = Environment::new(env)?;
    let table = super::load_client_table(clients_path)?;
    let enabled: Vec<ClientId> = table
        .enabled()
        .filter(|c| c.environment == environment)
        .map(|c| c.client_id.clone())
        .collect();

    let raw = std::fs::read_to_string(outputs_path)
        .with_context(|| format!("cannot read outputs snapshot {outputs_path}"))?;
    let snapshot: Vec<LayerOutput> = serde_json::from_str(&raw)
        .with_context(|| format!("cannot parse outputs snapshot {outputs_path}"))?;
    let store = LayerOutputStore::new();
    store.load(snapshot).map_err(enclave_common::EnclaveError::from)?;

    match check_preconditions(layer, &environment, &enabled, &store) {
        Ok(()) => {
            println!(
                "{} {layer}/{environment}: all {} enabled client(s) satisfied",
                "OK".green().bold(),
                enabled.len()
            );
            Ok(())
        }
        Err(LayerError::MissingUpstream { missing, .. }) => {
            if format.is_table() {
                for m in &missing {
                    println!("  missing: {m}");
                }
                println!("{} {layer}/{environment}", "BLOCKED".red().bold());
            } else {
                format.print_serialized(&missing);
            }
            // Fail closed: the layer must not plan or apply
            std::process::exit(1);
        }
        Err(other) => Err(enclave_common::EnclaveError::from(other).into()),
    }
}
