//! `enclave tags` - canonical tag map for one client

use crate::output::OutputFormat;
use anyhow::{bail, Context};
use enclave_common::ClientId;
use enclave_naming::TagSet;
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TagRow {
    key: String,
    value: String,
}

pub fn handle(
    clients_path: &str,
    client: &str,
    overrides: &[String],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let table = super::load_client_table(clients_path)?;
    let client_id = ClientId::new(client)?;
    let Some(record) = table.find(&client_id) else {
        bail!("client '{client_id}' not found in {clients_path}");
    };

    let mut override_layer = BTreeMap::new();
    for pair in overrides {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("override '{pair}' is not KEY=VALUE"))?;
        override_layer.insert(key.to_string(), value.to_string());
    }

    let tags = TagSet::standard(record).with_layer(override_layer).render();

    if format.is_table() {
        let rows: Vec<TagRow> = tags
            .iter()
            .map(|(k, v)| TagRow {
                key: k.clone(),
                value: v.clone(),
            })
            .collect();
        println!("{}", Table::new(rows));
    } else {
        format.print_serialized(&tags);
    }
    Ok(())
}
