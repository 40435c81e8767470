//! Secure-element command packet and response payload

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;

use crate::{
    crc,
    error::{Error, Result},
};

/// Command packet sent on the `e:t` channel
///
/// # Packet Structure
///
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Length  │ Opcode  │ Param1  │ Param2  │  Data   │  CRC16  │
/// │ 1 byte  │ 1 byte  │ 1 byte  │ 2 bytes │ N bytes │ 2 bytes │
/// │         │         │         │ (LE)    │         │ (LE)    │
/// └─────────┴─────────┴─────────┴─────────┴─────────┴─────────┘
/// ```
///
/// `Length` counts the whole packet, itself and the CRC included (`N + 7`).
///
/// # Examples
///
/// ```
/// use atkit_core::CommandPacket;
///
/// let packet = CommandPacket::new(0x02, 0, 0x0000);
/// let encoded = packet.encode().unwrap();
/// assert_eq!(encoded.len(), 7);
/// assert_eq!(encoded[0], 7);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct CommandPacket {
    /// Opcode
    pub opcode: u8,

    /// First parameter (zone, mode, ...)
    pub param1: u8,

    /// Second parameter (address, key id, ...)
    pub param2: u16,

    /// Command data
    pub data: Bytes,
}

impl CommandPacket {
    /// Length, opcode, param1, param2 and CRC
    pub const OVERHEAD: usize = 7;

    /// Largest data field the one-byte length can describe
    pub const MAX_DATA_SIZE: usize = u8::MAX as usize - Self::OVERHEAD;

    /// Create a packet with no data
    pub fn new(opcode: u8, param1: u8, param2: u16) -> Self {
        Self {
            opcode,
            param1,
            param2,
            data: Bytes::new(),
        }
    }

    /// Create a packet with data
    pub fn with_data(opcode: u8, param1: u8, param2: u16, data: impl Into<Bytes>) -> Self {
        Self {
            opcode,
            param1,
            param2,
            data: data.into(),
        }
    }

    /// Value of the length byte
    pub fn size(&self) -> usize {
        self.data.len() + Self::OVERHEAD
    }

    /// Encode packet to bytes, CRC included
    ///
    /// # Errors
    ///
    /// Returns [`Error::PacketTooLarge`] if the data exceeds [`Self::MAX_DATA_SIZE`].
    pub fn encode(&self) -> Result<BytesMut> {
        if self.data.len() > Self::MAX_DATA_SIZE {
            return Err(Error::PacketTooLarge {
                size: self.data.len(),
                max: Self::MAX_DATA_SIZE,
            });
        }

        let mut buf = BytesMut::with_capacity(self.size());

        buf.put_u8(self.size() as u8);
        buf.put_u8(self.opcode);
        buf.put_u8(self.param1);
        buf.put_u16_le(self.param2);
        buf.put_slice(&self.data);

        let crc = crc::compute(&buf);
        buf.put_slice(&crc);

        Ok(buf)
    }
}

impl fmt::Debug for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandPacket")
            .field("opcode", &format!("0x{:02X}", self.opcode))
            .field("param1", &format!("0x{:02X}", self.param1))
            .field("param2", &format!("0x{:04X}", self.param2))
            .field("data_len", &self.data.len())
            .finish()
    }
}

impl fmt::Display for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command[0x{:02X}](p1=0x{:02X}, p2=0x{:04X}, len={})",
            self.opcode,
            self.param1,
            self.param2,
            self.data.len()
        )
    }
}

/// Decoded body of a successful `e:t` reply
///
/// ```text
/// [leading byte][payload: N bytes][crc: 2 bytes]
/// ```
///
/// Only `payload` carries meaning for callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponsePayload {
    /// Count byte reported by the device
    pub leading: u8,

    /// Semantic payload
    pub payload: Bytes,

    /// Trailing CRC bytes, if the body was long enough to have them
    pub crc: Option<[u8; 2]>,

    raw: Bytes,
}

impl ResponsePayload {
    /// Hex-decode a reply body
    ///
    /// Bodies shorter than 3 bytes yield an empty payload.
    pub fn from_hex(data: &str) -> Result<Self> {
        let raw = Bytes::from(hex::decode(data)?);

        if raw.len() < 3 {
            return Ok(Self {
                leading: raw.first().copied().unwrap_or(0),
                payload: Bytes::new(),
                crc: None,
                raw,
            });
        }

        let end = raw.len() - 2;
        Ok(Self {
            leading: raw[0],
            payload: raw.slice(1..end),
            crc: Some([raw[end], raw[end + 1]]),
            raw,
        })
    }

    /// Check the trailing CRC against the leading byte and payload
    pub fn crc_matches(&self) -> bool {
        match self.crc {
            Some(field) => crc::verify(&self.raw[..self.raw.len() - 2], field),
            None => false,
        }
    }

    /// Full decoded body
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    pub fn into_payload(self) -> Bytes {
        self.payload
    }
}
