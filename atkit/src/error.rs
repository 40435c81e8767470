//! High-level error types

use atkit_core::{KitStatus, Opcode, SessionState};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] atkit_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] atkit_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] atkit_types::Error),

    #[error(
        "Command {}(0x{opcode:02X}, p1=0x{param1:02X}, p2=0x{param2:04X}) returned status 0x{status:02X}: {}",
        opcode_name(.opcode),
        describe(.status)
    )]
    DeviceStatus {
        opcode: u8,
        param1: u8,
        param2: u16,
        status: u8,
    },

    #[error("Kit request on {target} returned status 0x{status:02X}: {}", describe(.status))]
    KitStatus {
        target: &'static str,
        status: u8,
    },

    #[error("Memory access failed (zone {zone}, slot {slot}, offset {offset}): {source}")]
    Memory {
        zone: u8,
        slot: u8,
        offset: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Short read: expected {expected} bytes, device returned {actual}")]
    ShortRead {
        expected: usize,
        actual: usize,
    },

    #[error("Session not ready (state: {0})")]
    NotReady(SessionState),
}

fn opcode_name(opcode: &u8) -> &'static str {
    Opcode::name_of(*opcode)
}

fn describe(status: &u8) -> &'static str {
    KitStatus::describe(*status)
}

impl Error {
    /// Status byte reported by the kit or device, if this error carries one
    pub fn status(&self) -> Option<u8> {
        match self {
            Self::DeviceStatus { status, .. } | Self::KitStatus { status, .. } => Some(*status),
            Self::Memory { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Check if the failure was a transport timeout
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Memory { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Check if re-issuing the same request might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Core(e) => e.is_recoverable(),
            Self::Memory { source, .. } => source.is_recoverable(),
            Self::ShortRead { .. } => true,
            _ => false,
        }
    }
}
