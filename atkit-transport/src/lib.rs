//! Transport layer for the kit protocol
//!
//! Moves ASCII frames over fixed-size HID reports.

pub mod error;
pub mod hid_transport;
#[cfg(feature = "hidapi")]
pub mod hid;
pub mod mock;

pub use error::{Error, Result};
pub use hid_transport::HidTransport;
#[cfg(feature = "hidapi")]
pub use hid::HidapiDevice;
pub use mock::MockDevice;

/// One HID interface, one report at a time
///
/// Implementations own the underlying handle and release it when dropped.
#[cfg_attr(test, mockall::automock)]
pub trait ReportDevice {
    /// Write one output report (report ID included)
    ///
    /// Returns the number of bytes written.
    fn write_report(&mut self, report: &[u8]) -> Result<usize>;

    /// Read one input report into `buf`, waiting up to `timeout_ms`
    ///
    /// A `timeout_ms` of 0 blocks until a report arrives. Returns 0 when the
    /// timeout elapsed without data.
    fn read_report(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize>;

    /// Human-readable description of the device
    fn description(&self) -> String;
}

impl<D: ReportDevice + ?Sized> ReportDevice for Box<D> {
    fn write_report(&mut self, report: &[u8]) -> Result<usize> {
        (**self).write_report(report)
    }

    fn read_report(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize> {
        (**self).read_report(buf, timeout_ms)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}
