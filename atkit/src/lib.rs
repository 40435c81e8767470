//! # atkit
//!
//! Host-side driver for CryptoAuthentication kit boards over USB HID.
//!
//! The kit firmware tunnels secure-element commands through short ASCII
//! frames (`e:t(0702000000...)\n`) carried in 64-byte HID reports.
//!
//! ## Features
//!
//! - Blocking request/response API with explicit timeouts
//! - Zone memory access at byte granularity
//! - Device revision, lock state and public key helpers
//! - `hidapi` feature for real hardware, [`MockDevice`] for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! # #[cfg(feature = "hidapi")]
//! # fn main() -> atkit::Result<()> {
//! use atkit::{KitConfig, KitDevice, Zone};
//!
//! let mut kit = KitDevice::open(KitConfig::default())?;
//! kit.connect()?;
//!
//! let config = kit.read_bytes(Zone::Config, 0, 0, 128)?;
//! println!("{}", hex::encode(&config));
//!
//! kit.close();
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "hidapi"))]
//! # fn main() {}
//! ```

pub mod config;
pub mod device;
pub mod dispatcher;
pub mod error;
pub mod memory;

// Re-exports
pub use config::KitConfig;
pub use device::KitDevice;
pub use dispatcher::CommandDispatcher;
pub use error::{Error, Result};
pub use memory::MemoryAccessor;

// Re-export protocol and transport types
pub use atkit_core::{CommandPacket, KitStatus, Opcode, Response, SessionState, Zone};
#[cfg(feature = "hidapi")]
pub use atkit_transport::HidapiDevice;
pub use atkit_transport::{HidTransport, MockDevice, ReportDevice};
pub use atkit_types::{DeviceRevision, DeviceType, KitDateTime, KitInfo, LockStatus, PublicKey};
