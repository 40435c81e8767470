//! Scripted in-memory report device
//!
//! Replies are queued up front and handed out one report per read; every
//! written report is recorded. Clones share the same queues, so a test can
//! keep a handle after moving the device into a transport.

use std::collections::VecDeque;
use std::sync::Arc;

use atkit_core::constants::REPORT_SIZE;
use atkit_core::crc;
use parking_lot::Mutex;
use tracing::trace;

use crate::{error::*, ReportDevice};

/// Shared log of written reports
pub type ReportLog = Arc<Mutex<Vec<Vec<u8>>>>;

/// In-memory [`ReportDevice`]
#[derive(Debug, Clone, Default)]
pub struct MockDevice {
    inbound: Arc<Mutex<VecDeque<Vec<u8>>>>,
    written: ReportLog,
}

impl MockDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one raw input report
    pub fn push_report(&mut self, report: &[u8]) {
        self.inbound.lock().push_back(report.to_vec());
    }

    /// Queue a reply text, split into 64-byte reports
    pub fn push_reply(&mut self, text: &str) {
        for chunk in text.as_bytes().chunks(REPORT_SIZE) {
            self.push_report(chunk);
        }
    }

    /// Queue an `e:t` reply carrying `payload`
    ///
    /// The body is framed the way the kit does it: count byte, payload, CRC.
    pub fn push_response(&mut self, status: u8, payload: &[u8]) {
        let mut body = Vec::with_capacity(payload.len() + 3);
        body.push((payload.len() + 3) as u8);
        body.extend_from_slice(payload);
        let field = crc::compute(&body);
        body.extend_from_slice(&field);

        let text = format!("{:02X}({})\n", status, hex_upper(&body));
        self.push_reply(&text);
    }

    /// Handle on the written-report log
    pub fn written(&self) -> ReportLog {
        Arc::clone(&self.written)
    }

    /// Written reports with the report ID and EOT padding removed, joined
    pub fn written_text(&self) -> String {
        self.written
            .lock()
            .iter()
            .flat_map(|report| report.iter().skip(1).copied())
            .filter(|&b| b != 0x04)
            .map(char::from)
            .collect()
    }

    /// Number of replies still queued
    pub fn pending(&self) -> usize {
        self.inbound.lock().len()
    }
}

fn hex_upper(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02X}", b)).collect()
}

impl ReportDevice for MockDevice {
    fn write_report(&mut self, report: &[u8]) -> Result<usize> {
        trace!("Mock write {} bytes", report.len());
        self.written.lock().push(report.to_vec());
        Ok(report.len())
    }

    fn read_report(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize> {
        let Some(report) = self.inbound.lock().pop_front() else {
            return Ok(0);
        };

        let n = report.len().min(buf.len());
        buf[..n].copy_from_slice(&report[..n]);
        Ok(n)
    }

    fn description(&self) -> String {
        "mock kit device".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_reads_in_order() {
        let mut device = MockDevice::new();
        device.push_report(b"one");
        device.push_report(b"two");

        let mut buf = [0u8; 64];
        assert_eq!(device.read_report(&mut buf, 0).unwrap(), 3);
        assert_eq!(&buf[..3], b"one");
        assert_eq!(device.read_report(&mut buf, 0).unwrap(), 3);
        assert_eq!(&buf[..3], b"two");
        assert_eq!(device.read_report(&mut buf, 0).unwrap(), 0);
    }

    #[test]
    fn test_push_reply_splits_reports() {
        let mut device = MockDevice::new();
        device.push_reply(&"a".repeat(100));

        assert_eq!(device.pending(), 2);
    }

    #[test]
    fn test_push_response_framing() {
        let mut device = MockDevice::new();
        device.push_response(0x00, &[0xAA, 0xBB, 0xCC, 0xDD]);

        let mut buf = [0u8; 64];
        let n = device.read_report(&mut buf, 0).unwrap();
        let text = std::str::from_utf8(&buf[..n]).unwrap();

        assert!(text.starts_with("00(07AABBCCDD"));
        assert!(text.ends_with(")\n"));
        assert_eq!(text.len(), 2 + 1 + 14 + 2);
    }

    #[test]
    fn test_clones_share_state() {
        let device = MockDevice::new();
        let mut wire = device.clone();
        let mut owned = device;

        owned.write_report(&[0x00, b'x', 0x04]).unwrap();
        wire.push_report(b"hi");

        assert_eq!(wire.written_text(), "x");
        assert_eq!(owned.pending(), 1);
    }
}
