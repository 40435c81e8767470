//! Kit connection settings

use atkit_core::constants::{
    DEFAULT_DISCOVERY_TIMEOUT_MS, DEFAULT_PRODUCT_ID, DEFAULT_TIMEOUT_MS, DEFAULT_VENDOR_ID,
    LEGACY_PRODUCT_ID, LEGACY_VENDOR_ID, REPORT_SIZE,
};

/// Settings for opening and talking to a kit board
///
/// # Examples
///
/// ```
/// use atkit::KitConfig;
///
/// let config = KitConfig::default().with_timeout(2000);
/// assert_eq!(config.vendor_id, 0x03EB);
/// assert_eq!(config.timeout_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitConfig {
    /// USB vendor ID
    pub vendor_id: u16,

    /// USB product ID
    pub product_id: u16,

    /// HID report size
    pub report_size: usize,

    /// Per-report timeout for secure-element commands (ms)
    pub timeout_ms: u32,

    /// Per-report timeout for discovery/select/info (ms, 0 = wait forever)
    pub discovery_timeout_ms: u32,

    /// Index passed to discovery when connecting
    pub device_index: u8,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            vendor_id: DEFAULT_VENDOR_ID,
            product_id: DEFAULT_PRODUCT_ID,
            report_size: REPORT_SIZE,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            discovery_timeout_ms: DEFAULT_DISCOVERY_TIMEOUT_MS,
            device_index: 0,
        }
    }
}

impl KitConfig {
    /// Settings for older kit hardware (0x04D8:0x0F32)
    pub fn legacy() -> Self {
        Self::default().with_ids(LEGACY_VENDOR_ID, LEGACY_PRODUCT_ID)
    }

    /// Set USB vendor/product IDs
    pub fn with_ids(mut self, vendor_id: u16, product_id: u16) -> Self {
        self.vendor_id = vendor_id;
        self.product_id = product_id;
        self
    }

    /// Set command timeout
    pub fn with_timeout(mut self, timeout_ms: u32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set discovery timeout
    pub fn with_discovery_timeout(mut self, timeout_ms: u32) -> Self {
        self.discovery_timeout_ms = timeout_ms;
        self
    }

    /// Set report size
    pub fn with_report_size(mut self, report_size: usize) -> Self {
        self.report_size = report_size;
        self
    }

    /// Set discovery index
    pub fn with_device_index(mut self, index: u8) -> Self {
        self.device_index = index;
        self
    }
}
