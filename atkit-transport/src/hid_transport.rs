//! Frame chunking over fixed-size HID reports
//!
//! Outgoing frames are cut into `report_size` chunks. Each report is the
//! report ID followed by the chunk, padded with EOT (0x04) bytes:
//!
//! ```text
//! ┌──────┬──────────────────────────┬────────────────┐
//! │ 0x00 │ chunk (≤ report_size)    │ 0x04 padding   │
//! └──────┴──────────────────────────┴────────────────┘
//! ```
//!
//! Replies are read report by report until a newline shows up.

use atkit_core::constants::{MAX_REPLY_SIZE, REPORT_ID, REPORT_PAD, REPORT_SIZE};
use atkit_core::frame::EOP;
use bytes::{BufMut, BytesMut};
use tracing::{debug, trace};

use crate::{error::*, ReportDevice};

/// Kit transport over a HID report device
pub struct HidTransport<D: ReportDevice> {
    device: D,
    report_size: usize,
}

impl<D: ReportDevice> HidTransport<D> {
    /// Create transport with the standard 64-byte report size
    pub fn new(device: D) -> Self {
        Self {
            device,
            report_size: REPORT_SIZE,
        }
    }

    /// Set report size
    pub fn with_report_size(mut self, report_size: usize) -> Self {
        self.report_size = report_size.max(1);
        self
    }

    pub fn report_size(&self) -> usize {
        self.report_size
    }

    /// Borrow the underlying device
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Mutably borrow the underlying device
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Give back the underlying device
    pub fn into_inner(self) -> D {
        self.device
    }

    /// Write a complete frame
    ///
    /// Reports are sent in order with no acknowledgment in between.
    pub fn write(&mut self, frame: &[u8]) -> Result<()> {
        trace!(
            "Writing frame ({} bytes): {:?}",
            frame.len(),
            String::from_utf8_lossy(frame)
        );

        let mut report = BytesMut::with_capacity(self.report_size + 1);

        for chunk in frame.chunks(self.report_size) {
            report.clear();
            report.put_u8(REPORT_ID);
            report.put_slice(chunk);
            report.resize(self.report_size + 1, REPORT_PAD);

            let written = self.device.write_report(&report)?;
            if written < report.len() {
                return Err(Error::ShortWrite {
                    expected: report.len(),
                    actual: written,
                });
            }
        }

        Ok(())
    }

    /// Read one reply frame
    ///
    /// Leading bytes up to and including space (0x20) are discarded until
    /// the first printable byte shows up, so a report holding nothing but
    /// noise contributes nothing. Everything after the first newline is
    /// dropped; the returned text keeps its terminating newline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Timeout`] as soon as any single report read comes back empty,
    /// and [`Error::ReplyTooLong`] once more than [`MAX_REPLY_SIZE`] bytes arrive
    /// without a newline.
    pub fn read(&mut self, timeout_ms: u32) -> Result<String> {
        let mut data = BytesMut::with_capacity(self.report_size);
        let mut chunk = vec![0u8; self.report_size];

        loop {
            let n = self.device.read_report(&mut chunk, timeout_ms)?;
            if n == 0 {
                debug!("No report within {} ms", timeout_ms);
                return Err(Error::Timeout { timeout_ms });
            }

            let mut received = &chunk[..n];
            trace!("Received report ({} bytes): {:02X?}", n, received);

            if data.is_empty() {
                let start = received
                    .iter()
                    .position(|&b| b > b' ')
                    .unwrap_or(received.len());
                received = &received[start..];
            }

            let end = received.iter().position(|&b| b == EOP);
            if let Some(end) = end {
                received = &received[..=end];
            }
            data.put_slice(received);

            if data.len() > MAX_REPLY_SIZE {
                return Err(Error::ReplyTooLong {
                    limit: MAX_REPLY_SIZE,
                });
            }

            if end.is_some() {
                break;
            }
        }

        // Kit replies are plain ASCII, map byte values straight to chars
        Ok(data.iter().map(|&b| b as char).collect())
    }

    pub fn description(&self) -> String {
        self.device.description()
    }
}
