//! hidapi-backed report device

use hidapi::{HidApi, HidDevice};
use tracing::{debug, warn};

use crate::{error::*, ReportDevice};

/// Kit board opened through hidapi
///
/// The HID handle is closed when this value is dropped.
pub struct HidapiDevice {
    device: HidDevice,
    vendor_id: u16,
    product_id: u16,
}

impl HidapiDevice {
    /// Open the first HID interface matching `vendor_id`/`product_id`
    pub fn open(vendor_id: u16, product_id: u16) -> Result<Self> {
        let api = HidApi::new()?;

        let present = api
            .device_list()
            .any(|info| info.vendor_id() == vendor_id && info.product_id() == product_id);
        if !present {
            return Err(Error::DeviceNotFound {
                vendor_id,
                product_id,
            });
        }

        debug!("Opening HID device {:04X}:{:04X}...", vendor_id, product_id);

        let device = api.open(vendor_id, product_id)?;
        // Reads block with an explicit timeout, never poll
        device.set_blocking_mode(true)?;

        debug!("Opened HID device {:04X}:{:04X}", vendor_id, product_id);

        Ok(Self {
            device,
            vendor_id,
            product_id,
        })
    }

    /// USB product string, if the firmware reports one
    pub fn product_string(&self) -> Option<String> {
        self.device.get_product_string().ok().flatten()
    }
}

impl ReportDevice for HidapiDevice {
    fn write_report(&mut self, report: &[u8]) -> Result<usize> {
        Ok(self.device.write(report)?)
    }

    fn read_report(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize> {
        // hidapi treats 0 as "don't wait" and -1 as "wait forever"
        let timeout = match timeout_ms {
            0 => -1,
            ms => i32::try_from(ms).unwrap_or(i32::MAX),
        };

        self.device.read_timeout(buf, timeout).map_err(|e| {
            warn!("HID read error: {}", e);
            Error::from(e)
        })
    }

    fn description(&self) -> String {
        format!("HID {:04X}:{:04X}", self.vendor_id, self.product_id)
    }
}

impl Drop for HidapiDevice {
    fn drop(&mut self) {
        debug!("Closing HID device {}", self.description());
    }
}
