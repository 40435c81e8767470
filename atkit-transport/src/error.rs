//! Transport errors

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Timeout (>{timeout_ms} ms) waiting for reply from kit device")]
    Timeout { timeout_ms: u32 },

    #[error("HID error: {0}")]
    Hid(String),

    #[error("Short HID write: expected {expected} bytes, wrote {actual}")]
    ShortWrite { expected: usize, actual: usize },

    #[error("Reply exceeds {limit} bytes without a terminator")]
    ReplyTooLong { limit: usize },

    #[error("Kit device {vendor_id:04X}:{product_id:04X} not found")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

#[cfg(feature = "hidapi")]
impl From<hidapi::HidError> for Error {
    fn from(e: hidapi::HidError) -> Self {
        Error::Hid(e.to_string())
    }
}
