//! Secure-element information decoded from command replies

use std::fmt;

use crate::error::{Error, Result};

/// Lock byte value meaning "unlocked"
const UNLOCKED: u8 = 0x55;

/// Secure-element family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Ecc508a,
    Ecc608a,
    Unknown(u8),
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ecc508a => write!(f, "ATECC508A"),
            Self::Ecc608a => write!(f, "ATECC608A"),
            Self::Unknown(code) => write!(f, "unknown(0x{:02X})", code),
        }
    }
}

/// Revision word returned by the INFO command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceRevision {
    pub bytes: [u8; 4],
}

impl DeviceRevision {
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        let bytes: [u8; 4] = payload
            .get(..4)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Revision needs 4 bytes, got {}",
                    payload.len()
                ))
            })?;

        Ok(Self { bytes })
    }

    /// Device type code (third revision byte)
    pub fn type_code(&self) -> u8 {
        self.bytes[2]
    }

    pub fn device_type(&self) -> DeviceType {
        match self.type_code() {
            0x50 => DeviceType::Ecc508a,
            0x60 => DeviceType::Ecc608a,
            other => DeviceType::Unknown(other),
        }
    }
}

impl fmt::Display for DeviceRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (rev {:02X?})", self.device_type(), self.bytes)
    }
}

/// Lock state of the config and data zones
///
/// Decoded from config word 0x15, whose bytes 2 and 3 are the data and
/// config lock bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockStatus {
    pub config_locked: bool,
    pub data_locked: bool,
}

impl LockStatus {
    pub fn from_word(word: &[u8]) -> Result<Self> {
        if word.len() < 4 {
            return Err(Error::Validation(format!(
                "Lock word needs 4 bytes, got {}",
                word.len()
            )));
        }

        Ok(Self {
            data_locked: word[2] != UNLOCKED,
            config_locked: word[3] != UNLOCKED,
        })
    }
}

impl fmt::Display for LockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = |locked: bool| if locked { "Locked" } else { "Unlocked" };
        write!(
            f,
            "Config Zone: {}, Data Zone: {}",
            label(self.config_locked),
            label(self.data_locked)
        )
    }
}
