//! Print the public key of a slot as raw bytes, DER and PEM
//!
//! Usage: `cargo run --example public_key --features hidapi -- [slot]`

use anyhow::Context;
use atkit::{KitConfig, KitDevice};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let slot: u8 = match std::env::args().nth(1) {
        Some(arg) => arg.parse().context("slot must be a number")?,
        None => 0,
    };

    let mut kit = KitDevice::open(KitConfig::default())?;
    kit.connect()?;

    let key = kit
        .public_key(slot)
        .with_context(|| format!("reading public key of slot {}", slot))?;

    println!("Slot {} public key: {}", slot, key);
    println!("DER: {}", hex::encode_upper(key.to_der()));
    print!("{}", key.to_pem());

    kit.close();
    Ok(())
}
