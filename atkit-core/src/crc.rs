//! Kit protocol CRC
//!
//! The command packet carries a CRC-16 computed as follows:
//! 1. Run CRC-16/ARC (poly 0x8005, init 0x0000, xorout 0x0000) over every byte before the CRC field
//! 2. Reverse all 16 bits of the result
//! 3. Pack little-endian
//!
//! Step 2 is what makes this differ from an off-the-shelf CRC-16. It is the
//! same value the secure element computes with its bit-serial register
//! (data LSB first, register MSB first), so a reply's trailing CRC can be
//! checked with [`verify`].

use crc::{Crc, CRC_16_ARC};
use tracing::trace;

const ARC: Crc<u16> = Crc::<u16>::new(&CRC_16_ARC);

/// Plain CRC-16/ARC of `data`
///
/// # Examples
///
/// ```
/// use atkit_core::crc;
///
/// assert_eq!(crc::arc(b"123456789"), 0xBB3D);
/// ```
pub fn arc(data: &[u8]) -> u16 {
    ARC.checksum(data)
}

/// Calculate the CRC field for a kit command packet
///
/// # Algorithm
///
/// ```text
/// field = (crc16_arc(data)).reverse_bits().to_le_bytes()
/// ```
///
/// # Examples
///
/// ```
/// use atkit_core::crc;
///
/// let field = crc::compute(b"123456789");
/// assert_eq!(field, 0xBB3Du16.reverse_bits().to_le_bytes());
/// ```
pub fn compute(data: &[u8]) -> [u8; 2] {
    let value = arc(data).reverse_bits();

    trace!(
        len = data.len(),
        crc = format!("0x{:04X}", value),
        "Calculated kit CRC"
    );

    value.to_le_bytes()
}

/// Verify a CRC field against the bytes it covers
pub fn verify(data: &[u8], field: [u8; 2]) -> bool {
    compute(data) == field
}
