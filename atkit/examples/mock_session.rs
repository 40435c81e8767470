//! Walk through a kit session against a scripted device
//!
//! Runs without hardware; set `RUST_LOG=trace` to see every frame.

use atkit::{KitConfig, KitDevice, MockDevice, Zone};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()))
        .init();

    let device = MockDevice::new();
    let mut script = device.clone();

    script.push_reply("AT88CK590 00(020000)\n");
    script.push_reply("ECC508 TWI 00(C0)\n");
    script.push_reply("00()\n");
    script.push_response(0x00, &[0x00, 0x00, 0x50, 0x00]);
    script.push_response(0x00, &[0xC0, 0x00, 0x55, 0x00]);
    script.push_response(0x00, &[0x00, 0x00, 0x55, 0x55]);

    let mut kit = KitDevice::with_device(device, KitConfig::default())?;
    println!("{}", kit.kit_info()?);

    kit.connect()?;
    println!("Revision: {}", kit.device_revision()?);

    let word = kit.read_bytes(Zone::Config, 0, 16, 4)?;
    println!("Config word 0x04: {}", hex::encode_upper(&word));
    println!("{}", kit.lock_status()?);

    println!("Frames sent:\n{}", script.written_text());

    kit.close();
    Ok(())
}
