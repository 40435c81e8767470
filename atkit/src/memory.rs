//! Byte-range access to zone memory
//!
//! The device only reads and writes whole 4-byte words. Reads cover the
//! words spanning the requested range and cut the result down to the
//! requested bytes; writes must already be word-aligned.

use bytes::{Bytes, BytesMut};
use tracing::debug;

use atkit_core::address::{calc_address, word_offsets, WORD_SIZE};
use atkit_core::Opcode;
use atkit_transport::ReportDevice;

use crate::dispatcher::CommandDispatcher;
use crate::error::{Error, Result};

/// Word-by-word memory access through a dispatcher
pub struct MemoryAccessor<'a, D: ReportDevice> {
    dispatcher: &'a mut CommandDispatcher<D>,
}

impl<'a, D: ReportDevice> MemoryAccessor<'a, D> {
    pub fn new(dispatcher: &'a mut CommandDispatcher<D>) -> Self {
        Self { dispatcher }
    }

    /// Read `length` bytes starting at byte `offset`
    ///
    /// `offset` need not be word-aligned. Every word address is checked
    /// before the first command goes out.
    pub fn read_bytes(
        &mut self,
        zone: u8,
        slot: u8,
        offset: usize,
        length: usize,
        timeout_ms: u32,
    ) -> Result<Bytes> {
        if length == 0 {
            return Ok(Bytes::new());
        }

        let addresses = word_addresses(zone, slot, offset, length)?;
        debug!(zone, slot, offset, length, "Reading memory");

        let mut words = BytesMut::with_capacity(addresses.len() * WORD_SIZE);

        for (x, addr) in addresses {
            let word = self
                .dispatcher
                .send_command_and_unwrap(Opcode::Read.into(), zone, addr, &[], timeout_ms)
                .map_err(at(zone, slot, x))?;
            words.extend_from_slice(&word);
        }

        let start = offset % WORD_SIZE;
        if words.len() < start + length {
            return Err(at(zone, slot, offset)(Error::ShortRead {
                expected: start + length,
                actual: words.len(),
            }));
        }

        Ok(words.freeze().slice(start..start + length))
    }

    /// Write `data` starting at byte `offset`
    ///
    /// # Errors
    ///
    /// Fails before touching the device unless `offset` and `data.len()` are
    /// multiples of 4 ([`atkit_core::Error::Alignment`]) and every word lies
    /// inside the zone ([`atkit_core::Error::InvalidAddress`]).
    pub fn write_bytes(
        &mut self,
        zone: u8,
        slot: u8,
        offset: usize,
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<()> {
        if offset % WORD_SIZE != 0 || data.len() % WORD_SIZE != 0 {
            return Err(at(zone, slot, offset)(
                atkit_core::Error::Alignment {
                    offset,
                    len: data.len(),
                }
                .into(),
            ));
        }

        let addresses = word_addresses(zone, slot, offset, data.len())?;
        debug!(zone, slot, offset, len = data.len(), "Writing memory");

        for ((x, addr), word) in addresses.into_iter().zip(data.chunks(WORD_SIZE)) {
            self.dispatcher
                .send_command_and_unwrap(Opcode::Write.into(), zone, addr, word, timeout_ms)
                .map_err(at(zone, slot, x))?;
        }

        Ok(())
    }
}

/// Offset and word address of every word covering `[offset, offset + length)`
fn word_addresses(zone: u8, slot: u8, offset: usize, length: usize) -> Result<Vec<(usize, u16)>> {
    word_offsets(offset, length)
        .map_err(|e| at(zone, slot, offset)(e.into()))?
        .map(|x| {
            calc_address(zone, slot, x)
                .map(|addr| (x, addr))
                .map_err(|e| at(zone, slot, x)(e.into()))
        })
        .collect()
}

/// Attach zone/slot/offset to an error
fn at(zone: u8, slot: u8, offset: usize) -> impl Fn(Error) -> Error {
    move |source| Error::Memory {
        zone,
        slot,
        offset,
        source: Box::new(source),
    }
}
