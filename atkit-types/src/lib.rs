//! Type definitions for atkit

pub mod datetime;
pub mod device;
pub mod error;
pub mod kit_info;
pub mod public_key;

pub use datetime::KitDateTime;
pub use device::{DeviceRevision, DeviceType, LockStatus};
pub use error::{Error, Result};
pub use kit_info::KitInfo;
pub use public_key::PublicKey;
