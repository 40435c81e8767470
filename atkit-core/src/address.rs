//! Zone/slot/offset to word address translation
//!
//! Memory is read and written one 4-byte word at a time. A byte offset is
//! split into a 32-byte block and a word within that block:
//!
//! ```text
//! block = offset / 32
//! word  = (offset / 4) & 0x7
//!
//! data zone:   addr = block << 8 | slot << 3 | word
//! config zone: addr = block << 3 | word
//! ```

use std::fmt;

use crate::error::{Error, Result};

/// Size of one addressable word
pub const WORD_SIZE: usize = 4;

/// Size of one block
pub const BLOCK_SIZE: usize = 32;

/// Highest data-zone slot
pub const MAX_SLOT: u8 = 15;

/// Blocks addressable in the data zone (8-bit block field)
const DATA_BLOCKS: usize = 256;

/// Blocks addressable in the config zone (`block << 3` must fit in u16)
const CONFIG_BLOCKS: usize = 32;

/// Addressable memory zones
///
/// The OTP zone (1) exists on the device but is not addressable here.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Zone {
    /// Configuration memory
    Config = 0,

    /// Data (key slot) memory
    Data = 2,
}

impl From<Zone> for u8 {
    fn from(zone: Zone) -> u8 {
        zone as u8
    }
}

impl TryFrom<u8> for Zone {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Config),
            2 => Ok(Self::Data),
            _ => Err(Error::InvalidZone(value)),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config => write!(f, "config"),
            Self::Data => write!(f, "data"),
        }
    }
}

/// Translate a byte offset into the word address used as `param2`
///
/// `slot` is ignored for the config zone.
///
/// # Errors
///
/// Returns [`Error::InvalidZone`] for any zone other than 0 or 2, and
/// [`Error::InvalidAddress`] when the slot is above [`MAX_SLOT`] or the
/// offset lies past the zone's last block.
///
/// # Examples
///
/// ```
/// use atkit_core::address::calc_address;
///
/// assert_eq!(calc_address(2, 0, 32).unwrap(), 0x0100);
/// assert_eq!(calc_address(0, 9, 64).unwrap(), 0x0010);
/// assert!(calc_address(1, 0, 0).is_err());
/// assert!(calc_address(2, 16, 0).is_err());
/// ```
pub fn calc_address(zone: u8, slot: u8, offset: usize) -> Result<u16> {
    let block = offset / BLOCK_SIZE;
    let word = ((offset / WORD_SIZE) & 0x7) as u16;
    let out_of_range = || Error::InvalidAddress { zone, slot, offset };

    match Zone::try_from(zone)? {
        Zone::Data => {
            if slot > MAX_SLOT || block >= DATA_BLOCKS {
                return Err(out_of_range());
            }
            Ok(((block as u16) << 8) | (u16::from(slot) << 3) | word)
        }
        Zone::Config => {
            if block >= CONFIG_BLOCKS {
                return Err(out_of_range());
            }
            Ok(((block as u16) << 3) | word)
        }
    }
}

/// Word-aligned offsets covering `[offset, offset + length)`
///
/// # Errors
///
/// Returns [`Error::RangeOverflow`] if the range end does not fit in `usize`.
pub fn word_offsets(offset: usize, length: usize) -> Result<impl Iterator<Item = usize>> {
    let end = offset.checked_add(length).ok_or(Error::RangeOverflow {
        offset,
        len: length,
    })?;

    let start = offset / WORD_SIZE * WORD_SIZE;
    Ok((start..end).step_by(WORD_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_data_zone_origin() {
        assert_eq!(calc_address(2, 0, 0).unwrap(), 0x0000);
    }

    #[test]
    fn test_data_zone_second_block() {
        assert_eq!(calc_address(2, 0, 32).unwrap(), 0x0100);
    }

    #[test]
    fn test_data_zone_slot_and_word() {
        // slot 8, byte 36 -> block 1, word 1
        assert_eq!(calc_address(2, 8, 36).unwrap(), 0x0141);
    }

    #[test]
    fn test_config_zone_ignores_slot() {
        assert_eq!(calc_address(0, 0, 64).unwrap(), 0x0010);
        assert_eq!(calc_address(0, 15, 64).unwrap(), 0x0010);
    }

    #[test]
    fn test_config_lock_word() {
        // bytes 84..88 hold the lock bytes
        assert_eq!(calc_address(0, 0, 84).unwrap(), 0x0015);
    }

    #[test]
    fn test_invalid_zone() {
        assert!(matches!(calc_address(1, 0, 0), Err(Error::InvalidZone(1))));
        assert!(matches!(calc_address(3, 0, 0), Err(Error::InvalidZone(3))));
    }

    #[test]
    fn test_zone_conversion() {
        assert_eq!(u8::from(Zone::Data), 2);
        assert_eq!(Zone::try_from(0).unwrap(), Zone::Config);
        assert!(Zone::try_from(1).is_err());
    }

    #[test]
    fn test_word_offsets_unaligned() {
        let offsets: Vec<_> = word_offsets(1, 2).unwrap().collect();
        assert_eq!(offsets, vec![0]);

        let offsets: Vec<_> = word_offsets(3, 6).unwrap().collect();
        assert_eq!(offsets, vec![0, 4, 8]);
    }

    #[test]
    fn test_word_offsets_empty() {
        assert_eq!(word_offsets(8, 0).unwrap().count(), 0);
    }

    #[test]
    fn test_word_offsets_overflow() {
        assert!(matches!(
            word_offsets(usize::MAX, 1),
            Err(Error::RangeOverflow { offset: usize::MAX, len: 1 })
        ));
    }

    #[test]
    fn test_data_zone_offset_past_last_block() {
        // 8192 = block 256, which would wrap onto address 0
        assert!(matches!(
            calc_address(2, 0, 8192),
            Err(Error::InvalidAddress { zone: 2, slot: 0, offset: 8192 })
        ));
        assert_eq!(calc_address(2, 0, 8191).unwrap(), 0xFF07);
    }

    #[test]
    fn test_data_zone_slot_out_of_range() {
        // slot 32 would alias block 1 of slot 0
        assert!(matches!(
            calc_address(2, 32, 0),
            Err(Error::InvalidAddress { slot: 32, .. })
        ));
        assert!(calc_address(2, 16, 0).is_err());
        assert_eq!(calc_address(2, 15, 0).unwrap(), 0x0078);
    }

    #[test]
    fn test_config_zone_offset_past_last_block() {
        assert!(matches!(
            calc_address(0, 0, 32 * 32),
            Err(Error::InvalidAddress { zone: 0, .. })
        ));
        assert_eq!(calc_address(0, 0, 32 * 32 - 1).unwrap(), 0x00FF);
    }

    #[test]
    fn test_config_zone_ignores_large_slot() {
        assert_eq!(calc_address(0, 200, 4).unwrap(), 0x0001);
    }

    proptest! {
        #[test]
        fn test_same_word_same_address(zone in prop_oneof![Just(0u8), Just(2u8)], slot in 0u8..16, offset in 0usize..1024) {
            let aligned = offset / WORD_SIZE * WORD_SIZE;
            prop_assert_eq!(
                calc_address(zone, slot, offset).unwrap(),
                calc_address(zone, slot, aligned).unwrap()
            );
        }

        #[test]
        fn test_data_zone_slot_bits(slot in 0u8..16, offset in 0usize..1024) {
            let addr = calc_address(2, slot, offset).unwrap();
            prop_assert_eq!(((addr >> 3) & 0x1F) as u8, slot);
        }
    }
}
