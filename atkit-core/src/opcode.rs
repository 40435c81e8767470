//! Secure-element opcodes and kit status codes

use std::fmt;

/// Opcodes the host issues through the kit
///
/// The dispatcher itself takes a raw `u8`; this enum names the ones the
/// higher-level helpers use.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Read one word from a zone
    Read = 0x02,

    /// Write one word to a zone
    Write = 0x12,

    /// Lock a zone
    Lock = 0x17,

    /// Device revision
    Info = 0x30,

    /// Generate a private key or derive its public key
    GenKey = 0x40,
}

impl Opcode {
    /// Get opcode name
    pub fn name(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Lock => "LOCK",
            Self::Info => "INFO",
            Self::GenKey => "GENKEY",
        }
    }

    /// Name for a raw opcode, if it is one of ours
    pub fn name_of(raw: u8) -> &'static str {
        Self::try_from(raw).map(Self::name).unwrap_or("UNKNOWN")
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, u8> {
        match value {
            0x02 => Ok(Self::Read),
            0x12 => Ok(Self::Write),
            0x17 => Ok(Self::Lock),
            0x30 => Ok(Self::Info),
            0x40 => Ok(Self::GenKey),
            other => Err(other),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// GenKey mode bits
pub mod genkey {
    /// Derive the public key of an existing private key
    pub const MODE_PUBLIC: u8 = 0x00;

    /// Create a new private key and return its public key
    pub const MODE_PRIVATE: u8 = 0x04;
}

/// Lock mode bits
pub mod lock {
    /// Lock the config zone without CRC check
    pub const CONFIG_NO_CRC: u8 = 0x80;

    /// Lock the data and OTP zones without CRC check
    pub const DATA_NO_CRC: u8 = 0x81;
}

/// Status codes produced by the kit firmware itself
///
/// Any other non-zero status comes from the device library.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KitStatus {
    Success = 0x00,
    UnknownCommand = 0xC0,
    UsbRxOverflow = 0xC1,
    UsbTxOverflow = 0xC2,
    InvalidParams = 0xC3,
    InvalidIfFunction = 0xC4,
    NoDevice = 0xC5,
}

impl KitStatus {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(Self::Success),
            0xC0 => Some(Self::UnknownCommand),
            0xC1 => Some(Self::UsbRxOverflow),
            0xC2 => Some(Self::UsbTxOverflow),
            0xC3 => Some(Self::InvalidParams),
            0xC4 => Some(Self::InvalidIfFunction),
            0xC5 => Some(Self::NoDevice),
            _ => None,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::UnknownCommand => "unknown command",
            Self::UsbRxOverflow => "USB receive overflow",
            Self::UsbTxOverflow => "USB transmit overflow",
            Self::InvalidParams => "invalid parameters",
            Self::InvalidIfFunction => "invalid interface function",
            Self::NoDevice => "no device",
        }
    }

    /// Human-readable description for any status byte
    pub fn describe(code: u8) -> &'static str {
        Self::from_code(code)
            .map(Self::description)
            .unwrap_or("device error")
    }
}
