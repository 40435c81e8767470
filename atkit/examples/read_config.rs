//! Dump the config zone of the first secure element on the kit

use atkit::{KitConfig, KitDevice, Zone};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = if std::env::var("KIT_LEGACY").is_ok() {
        KitConfig::legacy()
    } else {
        KitConfig::default()
    };

    let mut kit = KitDevice::open(config)?;
    println!("{}", kit.kit_info()?);

    let address = kit.connect()?;
    println!("Device at 0x{:02X}: {}", address, kit.device_revision()?);

    let zone = kit.read_bytes(Zone::Config, 0, 0, 128)?;
    for (i, row) in zone.chunks(16).enumerate() {
        println!("{:04X}: {}", i * 16, hex::encode_upper(row));
    }

    println!("{}", kit.lock_status()?);

    kit.close();
    Ok(())
}
