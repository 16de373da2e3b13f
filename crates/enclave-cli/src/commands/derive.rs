//! `enclave derive` - subnet partitioning for one address block

use crate::output::OutputFormat;
use enclave_netplan::derive;
use ipnet::Ipv4Net;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct SubnetRow {
    tier: String,
    zone: String,
    subnet: String,
}

pub fn handle(block: Ipv4Net, zones: &[String], format: OutputFormat) -> anyhow::Result<()> {
    let set = derive(block, zones).map_err(enclave_common::EnclaveError::from)?;

    if format.is_table() {
        let rows: Vec<SubnetRow> = set
            .iter()
            .map(|s| SubnetRow {
                tier: s.tier.to_string(),
                zone: s.zone.clone(),
                subnet: s.subnet.to_string(),
            })
            .collect();
        println!("{}", Table::new(rows));
    } else {
        format.print_serialized(&set);
    }
    Ok(())
}
