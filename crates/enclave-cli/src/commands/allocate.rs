//! `enclave allocate` - transactional check-and-insert into the ledger

use chrono::Utc;
use enclave_registry::{RegistryEntry, RegistryStore};

pub fn handle(
    registry_path: &str,
    client: &str,
    block: &str,
    region: &str,
    env: &str,
    notes: &str,
) -> anyhow::Result<()> {
    let store = RegistryStore::new(registry_path);
    store.check_and_insert(RegistryEntry {
        client_id: client.to_string(),
        address_block: block.to_string(),
        region: region.to_string(),
        environment: env.to_string(),
        allocated_date: Utc::now().date_naive(),
        notes: notes.to_string(),
    })?;
    println!("allocated {block} to {client}");
    Ok(())
}
