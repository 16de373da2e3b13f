//! `enclave validate` - the CI gate over the allocation registry

use crate::output::OutputFormat;
use colored::Colorize;
use enclave_registry::{validate, RegistryStore};

pub fn handle(registry_path: &str, format: OutputFormat) -> anyhow::Result<()> {
    let store = RegistryStore::new(registry_path);
    let registry = store.load()?;
    let report = validate(&registry.allocations);

    if format.is_table() {
        print!("{report}");
        if report.is_clean() {
            println!("{}", "OK".green().bold());
        } else {
            println!("{}", "FAILED".red().bold());
        }
    } else {
        format.print_serialized(&report);
    }

    if !report.is_clean() {
        // Hard block signal for CI, not an error of the tool itself
        std::process::exit(1);
    }
    Ok(())
}
