//! Protocol constants

/// USB vendor ID of current kit firmware
pub const DEFAULT_VENDOR_ID: u16 = 0x03EB;

/// USB product ID of current kit firmware
pub const DEFAULT_PRODUCT_ID: u16 = 0x2312;

/// USB vendor ID of older kit hardware
pub const LEGACY_VENDOR_ID: u16 = 0x04D8;

/// USB product ID of older kit hardware
pub const LEGACY_PRODUCT_ID: u16 = 0x0F32;

/// HID report payload size
pub const REPORT_SIZE: usize = 64;

/// Report ID prepended to every outgoing report
pub const REPORT_ID: u8 = 0x00;

/// Padding byte (EOT) filling the tail of a short report
pub const REPORT_PAD: u8 = 0x04;

/// Largest reply the kit firmware can send, terminator included
pub const MAX_REPLY_SIZE: usize = 2300;

/// Default command timeout (milliseconds)
pub const DEFAULT_TIMEOUT_MS: u32 = 5000;

/// Discovery timeout (milliseconds, 0 = block until a report arrives)
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u32 = 0;

/// Channel codes
pub mod target {
    /// Execute a secure-element transaction
    pub const TRANSACTION: &str = "e:t";

    /// Discover a device by index
    pub const DISCOVER: &str = "b:d";

    /// Select a device by address
    pub const SELECT: &str = "e:p:s";

    /// Kit firmware/library info
    pub const INFO: &str = "b:f";

    /// Kit application command
    pub const APP: &str = "b:a";
}

/// Kit application command ids (first byte of a `b:a` payload)
pub mod app {
    pub const SET_TIME: u8 = 0;
}

/// Config zone layout
pub mod config {
    /// Word holding the I2C address in its first byte
    pub const I2C_ADDRESS_WORD: u16 = 0x04;

    /// Word holding the lock bytes (data lock at +2, config lock at +3)
    pub const LOCK_WORD: u16 = 0x15;

    /// Lock byte value meaning "unlocked"
    pub const UNLOCKED: u8 = 0x55;
}
