//! Error types for atkit-core

/// Result type alias for kit protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reply text does not contain a `SS(DATA)` pattern
    #[error("Unable to parse kit protocol reply: {0:?}")]
    FrameParse(String),

    /// Zone outside of {0, 2}
    #[error("Invalid zone: {0} (only config=0 and data=2 are addressable)")]
    InvalidZone(u8),

    /// Slot or offset does not fit the zone's address fields
    #[error("Address out of range: zone {zone}, slot {slot}, offset {offset}")]
    InvalidAddress {
        zone: u8,
        slot: u8,
        offset: usize,
    },

    /// `offset + len` does not fit in `usize`
    #[error("Byte range overflows: offset {offset} with {len} bytes")]
    RangeOverflow {
        offset: usize,
        len: usize,
    },

    /// Write offset or length not word-aligned
    #[error("Unaligned write: offset {offset} with {len} bytes (both must be multiples of 4)")]
    Alignment {
        offset: usize,
        len: usize,
    },

    /// Command data does not fit the one-byte length field
    #[error("Packet too large: {size} bytes (max: {max} bytes)")]
    PacketTooLarge {
        size: usize,
        max: usize,
    },

    /// Reply body is not valid hex
    #[error("Invalid hex in reply body: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    /// Discovery reply did not carry a one-byte address
    #[error("Invalid device address in reply: {0:?}")]
    InvalidAddressReply(String),
}

impl Error {
    /// Check if error was caused by garbled reply content (re-issuing the command might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::FrameParse(_)
                | Self::InvalidHex(_)
                | Self::InvalidAddressReply(_)
        )
    }

    /// Check if error comes from caller-supplied arguments
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidZone(_)
                | Self::InvalidAddress { .. }
                | Self::RangeOverflow { .. }
                | Self::Alignment { .. }
                | Self::PacketTooLarge { .. }
        )
    }
}
