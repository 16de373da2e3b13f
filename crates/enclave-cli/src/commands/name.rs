//! `enclave name` - one deterministic resource name

use enclave_common::{ClientId, Environment, Region};
use enclave_naming::ResourceNamer;

pub fn handle(
    client: &str,
    env: &str,
    region: &str,
    kind: &str,
    qualifier: Option<&str>,
) -> anyhow::Result<()> {
    let namer = ResourceNamer::new(
        ClientId::new(client)?,
        Environment::new(env)?,
        Region::new(region)?,
    );
    println!("{}", namer.name(kind, qualifier)?);
    Ok(())
}
