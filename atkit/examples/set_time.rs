//! Push the current UTC time to the kit

use atkit::{KitConfig, KitDateTime, KitDevice};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut kit = KitDevice::open(KitConfig::default())?;

    let now = KitDateTime::from(chrono::Utc::now());
    kit.set_time(now)?;
    println!("Kit time set to {}", now);

    kit.close();
    Ok(())
}
