//! # atkit-core
//!
//! Core kit protocol implementation for CryptoAuthentication evaluation boards.
//!
//! This crate provides the low-level protocol primitives:
//! - Kit CRC calculation
//! - ASCII frame encoding/decoding
//! - Command packet structure and response payload
//! - Zone/slot/offset address translation
//! - Opcodes, status codes and protocol constants

pub mod address;
pub mod constants;
pub mod crc;
pub mod error;
pub mod frame;
pub mod opcode;
pub mod packet;
pub mod session;

pub use address::{calc_address, Zone};
pub use error::{Error, Result};
pub use frame::Response;
pub use opcode::{KitStatus, Opcode};
pub use packet::{CommandPacket, ResponsePayload};
pub use session::{Session, SessionState};

/// Kit protocol version this crate speaks
pub const KIT_VERSION: &str = "2.0.0";
