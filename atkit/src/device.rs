//! High-level kit interface

use bytes::Bytes;
use tracing::{debug, info, trace};

use atkit_core::address::WORD_SIZE;
use atkit_core::constants::{app, config as config_word, target};
use atkit_core::opcode::{genkey, lock};
use atkit_core::{frame, Opcode, Response, Session, SessionState, Zone};
use atkit_transport::{HidTransport, ReportDevice};
use atkit_types::{DeviceRevision, KitDateTime, KitInfo, LockStatus, PublicKey};

use crate::config::KitConfig;
use crate::dispatcher::CommandDispatcher;
use crate::error::{Error, Result};
use crate::memory::MemoryAccessor;

/// Kit board with one selected secure element
///
/// High-level interface over a [`ReportDevice`]. The device must be
/// [connected](Self::connect) before any secure-element command is sent.
///
/// # Examples
///
/// ```no_run
/// # #[cfg(feature = "hidapi")]
/// # fn main() -> atkit::Result<()> {
/// use atkit::{KitConfig, KitDevice};
///
/// let mut kit = KitDevice::open(KitConfig::default())?;
/// kit.connect()?;
///
/// println!("{}", kit.device_revision()?);
/// println!("{}", kit.lock_status()?);
///
/// kit.close();
/// # Ok(())
/// # }
/// # #[cfg(not(feature = "hidapi"))]
/// # fn main() {}
/// ```
pub struct KitDevice<D: ReportDevice> {
    dispatcher: CommandDispatcher<D>,
    session: Session,
    config: KitConfig,
}

#[cfg(feature = "hidapi")]
impl KitDevice<atkit_transport::HidapiDevice> {
    /// Open the kit board matching the configured VID/PID
    pub fn open(config: KitConfig) -> Result<Self> {
        let device = atkit_transport::HidapiDevice::open(config.vendor_id, config.product_id)?;
        Self::with_device(device, config)
    }
}

impl<D: ReportDevice> KitDevice<D> {
    /// Wrap an already opened report device
    pub fn with_device(device: D, config: KitConfig) -> Result<Self> {
        let transport = HidTransport::new(device).with_report_size(config.report_size);
        info!("Opened kit on {}", transport.description());

        let mut session = Session::new();
        session.open().map_err(Error::NotReady)?;

        Ok(Self {
            dispatcher: CommandDispatcher::new(transport),
            session,
            config,
        })
    }

    /// Get session state
    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Address of the selected secure element
    pub fn device_address(&self) -> Option<u8> {
        self.session.device_address()
    }

    pub fn config(&self) -> &KitConfig {
        &self.config
    }

    /// Discover the configured device index and select it
    ///
    /// Returns the selected device address.
    pub fn connect(&mut self) -> Result<u8> {
        self.ensure_open()?;

        let timeout = self.config.discovery_timeout_ms;
        let address = self.dispatcher.list(self.config.device_index, timeout)?;

        let ack = self.dispatcher.select(address, timeout)?;
        trace!("Select acknowledged: {:?}", ack);

        self.session.select(address).map_err(Error::NotReady)?;
        self.session.ready().map_err(Error::NotReady)?;

        info!("Connected to device at 0x{:02X}", address);
        Ok(address)
    }

    /// Raw reply to a kit info request
    pub fn info(&mut self, param1: u8) -> Result<String> {
        self.ensure_open()?;
        self.dispatcher
            .info(param1, self.config.discovery_timeout_ms)
    }

    /// Kit name and firmware version
    pub fn kit_info(&mut self) -> Result<KitInfo> {
        let raw = self.info(0)?;
        let response = frame::decode(&raw)?;

        Ok(KitInfo::new(raw, response.status, &response.data)?)
    }

    /// Push the host clock to the kit
    pub fn set_time(&mut self, time: KitDateTime) -> Result<()> {
        self.ensure_open()?;

        let mut payload = Vec::with_capacity(1 + KitDateTime::SIZE);
        payload.push(app::SET_TIME);
        time.write_to(&mut payload);

        let response = self.dispatcher.app_command(&payload, self.config.timeout_ms)?;
        if !response.is_success() {
            return Err(Error::KitStatus {
                target: target::APP,
                status: response.status,
            });
        }

        debug!("Kit time set to {}", time);
        Ok(())
    }

    /// Execute a command and return the parsed reply without checking its status
    pub fn send_command(
        &mut self,
        opcode: u8,
        param1: u8,
        param2: u16,
        data: &[u8],
    ) -> Result<Response> {
        self.ensure_ready()?;
        self.dispatcher
            .send_command(opcode, param1, param2, data, self.config.timeout_ms)
    }

    /// Execute a command and return its payload
    pub fn send_command_and_unwrap(
        &mut self,
        opcode: u8,
        param1: u8,
        param2: u16,
        data: &[u8],
    ) -> Result<Bytes> {
        self.ensure_ready()?;
        self.dispatcher
            .send_command_and_unwrap(opcode, param1, param2, data, self.config.timeout_ms)
    }

    /// Read `length` bytes of zone memory
    pub fn read_bytes(
        &mut self,
        zone: Zone,
        slot: u8,
        offset: usize,
        length: usize,
    ) -> Result<Bytes> {
        self.ensure_ready()?;

        let timeout = self.config.timeout_ms;
        MemoryAccessor::new(&mut self.dispatcher).read_bytes(
            zone.into(),
            slot,
            offset,
            length,
            timeout,
        )
    }

    /// Write word-aligned data to zone memory
    pub fn write_bytes(&mut self, zone: Zone, slot: u8, offset: usize, data: &[u8]) -> Result<()> {
        self.ensure_ready()?;

        let timeout = self.config.timeout_ms;
        MemoryAccessor::new(&mut self.dispatcher).write_bytes(
            zone.into(),
            slot,
            offset,
            data,
            timeout,
        )
    }

    /// Secure-element revision
    pub fn device_revision(&mut self) -> Result<DeviceRevision> {
        let payload = self.send_command_and_unwrap(Opcode::Info.into(), 0x00, 0x0000, &[])?;
        Ok(DeviceRevision::from_payload(&payload)?)
    }

    /// Lock state of the config and data zones
    pub fn lock_status(&mut self) -> Result<LockStatus> {
        let word = self.read_config_word(config_word::LOCK_WORD, WORD_SIZE)?;
        Ok(LockStatus::from_word(&word)?)
    }

    /// I2C address stored in the config zone
    pub fn i2c_address(&mut self) -> Result<u8> {
        let word = self.read_config_word(config_word::I2C_ADDRESS_WORD, 1)?;
        word.first().copied().ok_or(Error::ShortRead {
            expected: 1,
            actual: 0,
        })
    }

    /// Permanently lock the config zone
    pub fn lock_config_zone(&mut self) -> Result<()> {
        info!("Locking config zone");
        self.lock(lock::CONFIG_NO_CRC)
    }

    /// Permanently lock the data and OTP zones
    pub fn lock_data_zone(&mut self) -> Result<()> {
        info!("Locking data zone");
        self.lock(lock::DATA_NO_CRC)
    }

    /// Create a new private key in `slot` and return its public key
    pub fn gen_key(&mut self, slot: u8) -> Result<PublicKey> {
        info!(slot, "Generating private key");
        self.genkey(genkey::MODE_PRIVATE, slot)
    }

    /// Public key of the private key in `slot`
    pub fn public_key(&mut self, slot: u8) -> Result<PublicKey> {
        self.genkey(genkey::MODE_PUBLIC, slot)
    }

    /// Release the kit
    pub fn close(mut self) {
        self.session.close();
        info!("Closed kit on {}", self.dispatcher.transport().description());
    }

    // Helper methods

    fn ensure_open(&self) -> Result<()> {
        if !self.session.is_open() {
            return Err(Error::NotReady(self.session.state()));
        }
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        if !self.session.is_ready() {
            return Err(Error::NotReady(self.session.state()));
        }
        Ok(())
    }

    fn read_config_word(&mut self, word: u16, length: usize) -> Result<Bytes> {
        self.read_bytes(Zone::Config, 0, usize::from(word) * WORD_SIZE, length)
    }

    fn lock(&mut self, mode: u8) -> Result<()> {
        let payload = self.send_command_and_unwrap(Opcode::Lock.into(), mode, 0x0000, &[])?;

        match payload.first() {
            Some(&status) if status != 0x00 => Err(Error::DeviceStatus {
                opcode: Opcode::Lock.into(),
                param1: mode,
                param2: 0x0000,
                status,
            }),
            _ => Ok(()),
        }
    }

    fn genkey(&mut self, mode: u8, slot: u8) -> Result<PublicKey> {
        let payload =
            self.send_command_and_unwrap(Opcode::GenKey.into(), mode, u16::from(slot), &[])?;
        Ok(PublicKey::from_bytes(&payload)?)
    }
}

impl<D: ReportDevice> Drop for KitDevice<D> {
    fn drop(&mut self) {
        if self.session.state() != SessionState::Closed {
            debug!("Releasing kit (state: {})", self.session.state());
            self.session.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atkit_transport::MockDevice;
    use atkit_types::DeviceType;
    use pretty_assertions::assert_eq;

    fn kit() -> (KitDevice<MockDevice>, MockDevice) {
        let device = MockDevice::new();
        let wire = device.clone();
        (KitDevice::with_device(device, KitConfig::default()).unwrap(), wire)
    }

    fn connected_kit() -> (KitDevice<MockDevice>, MockDevice) {
        let (mut kit, mut wire) = kit();
        wire.push_reply("ECC508 TWI 00(C0)\n");
        wire.push_reply("00()\n");
        kit.connect().unwrap();

        wire.written().lock().clear();
        (kit, wire)
    }

    /// First `e:t` packet written, decoded
    fn sent_packet(wire: &MockDevice) -> Vec<u8> {
        let text = wire.written_text();
        let body = text
            .trim_end()
            .trim_start_matches("e:t(")
            .trim_end_matches(')');
        hex::decode(body).unwrap()
    }

    #[test]
    fn test_opened_on_creation() {
        let (kit, _wire) = kit();
        assert_eq!(kit.state(), SessionState::Opened);
        assert_eq!(kit.device_address(), None);
    }

    #[test]
    fn test_connect() {
        let (mut kit, mut wire) = kit();
        wire.push_reply("ECC508 TWI 00(C0)\n");
        wire.push_reply("00()\n");

        assert_eq!(kit.connect().unwrap(), 0xC0);
        assert_eq!(kit.state(), SessionState::Ready);
        assert_eq!(kit.device_address(), Some(0xC0));
        assert_eq!(wire.written_text(), "b:d(00)\ne:p:s(c0)\n");
    }

    #[test]
    fn test_connect_uses_device_index() {
        let device = MockDevice::new();
        let mut wire = device.clone();
        let mut kit =
            KitDevice::with_device(device, KitConfig::default().with_device_index(1)).unwrap();

        wire.push_reply("ECC608 TWI 00(B0)\n");
        wire.push_reply("00()\n");

        assert_eq!(kit.connect().unwrap(), 0xB0);
        assert!(wire.written_text().starts_with("b:d(01)\n"));
    }

    #[test]
    fn test_connect_no_device() {
        let (mut kit, mut wire) = kit();
        wire.push_reply("no_device C5()\n");

        let err = kit.connect().unwrap_err();
        assert_eq!(err.status(), Some(0xC5));
        assert_eq!(kit.state(), SessionState::Opened);
    }

    #[test]
    fn test_commands_require_ready() {
        let (mut kit, wire) = kit();

        let err = kit.send_command(0x02, 0, 0, &[]).unwrap_err();
        assert!(matches!(err, Error::NotReady(SessionState::Opened)));

        let err = kit.read_bytes(Zone::Config, 0, 0, 4).unwrap_err();
        assert!(matches!(err, Error::NotReady(_)));

        assert!(wire.written_text().is_empty());
    }

    #[test]
    fn test_device_revision() {
        let (mut kit, mut wire) = connected_kit();
        wire.push_response(0x00, &[0x00, 0x00, 0x50, 0x00]);

        let rev = kit.device_revision().unwrap();

        assert_eq!(rev.device_type(), DeviceType::Ecc508a);
        assert_eq!(wire.written_text(), "e:t(0730000000035d)\n");
    }

    #[test]
    fn test_lock_status() {
        let (mut kit, mut wire) = connected_kit();
        wire.push_response(0x00, &[0x00, 0x00, 0x55, 0x00]);

        let status = kit.lock_status().unwrap();
        assert!(!status.data_locked);
        assert!(status.config_locked);

        // Config word 0x15
        let packet = sent_packet(&wire);
        assert_eq!(&packet[1..5], &[0x02, 0x00, 0x15, 0x00]);
    }

    #[test]
    fn test_i2c_address() {
        let (mut kit, mut wire) = connected_kit();
        wire.push_response(0x00, &[0xC0, 0x00, 0x55, 0x00]);

        assert_eq!(kit.i2c_address().unwrap(), 0xC0);
        assert_eq!(&sent_packet(&wire)[1..5], &[0x02, 0x00, 0x04, 0x00]);
    }

    #[test]
    fn test_public_key() {
        let (mut kit, mut wire) = connected_kit();
        let mut key = [0u8; 64];
        key[0] = 0x11;
        key[63] = 0x22;
        wire.push_response(0x00, &key);

        let public = kit.public_key(3).unwrap();

        assert_eq!(public.as_bytes(), &key);
        assert_eq!(&sent_packet(&wire)[1..5], &[0x40, 0x00, 0x03, 0x00]);
    }

    #[test]
    fn test_gen_key() {
        let (mut kit, mut wire) = connected_kit();
        wire.push_response(0x00, &[0x33; 64]);

        kit.gen_key(2).unwrap();
        assert_eq!(&sent_packet(&wire)[1..5], &[0x40, 0x04, 0x02, 0x00]);
    }

    #[test]
    fn test_gen_key_short_payload() {
        let (mut kit, mut wire) = connected_kit();
        wire.push_response(0x00, &[0x33; 4]);

        let err = kit.gen_key(2).unwrap_err();
        assert!(matches!(err, Error::Types(_)));
    }

    #[test]
    fn test_lock_config_zone() {
        let (mut kit, mut wire) = connected_kit();
        wire.push_response(0x00, &[0x00]);

        kit.lock_config_zone().unwrap();
        assert_eq!(&sent_packet(&wire)[1..5], &[0x17, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn test_lock_data_zone_rejected() {
        let (mut kit, mut wire) = connected_kit();
        wire.push_response(0x00, &[0x0F]);

        let err = kit.lock_data_zone().unwrap_err();
        assert!(matches!(
            err,
            Error::DeviceStatus {
                opcode: 0x17,
                param1: 0x81,
                status: 0x0F,
                ..
            }
        ));
    }

    #[test]
    fn test_write_bytes_alignment() {
        let (mut kit, wire) = connected_kit();

        let err = kit.write_bytes(Zone::Data, 0, 1, &[0; 4]).unwrap_err();
        assert!(matches!(
            &err,
            Error::Memory { zone: 2, slot: 0, offset: 1, source }
                if matches!(**source, Error::Core(atkit_core::Error::Alignment { .. }))
        ));
        assert!(wire.written_text().is_empty());
    }

    #[test]
    fn test_set_time() {
        let (mut kit, mut wire) = kit();
        wire.push_reply("00()\n");

        let time = KitDateTime::new(2024, 3, 15, 12, 30, 45).unwrap();
        kit.set_time(time).unwrap();

        // 2024 = 0x07E8, little-endian
        assert_eq!(wire.written_text(), "b:a(00e807030f0c1e2d)\n");
    }

    #[test]
    fn test_set_time_rejected() {
        let (mut kit, mut wire) = kit();
        wire.push_reply("C3()\n");

        let time = KitDateTime::new(2024, 1, 1, 0, 0, 0).unwrap();
        let err = kit.set_time(time).unwrap_err();

        assert!(matches!(err, Error::KitStatus { status: 0xC3, .. }));
    }

    #[test]
    fn test_kit_info() {
        let (mut kit, mut wire) = kit();
        wire.push_reply("AT88CK590 00(020000)\n");

        let info = kit.kit_info().unwrap();
        assert_eq!(info.kit_name, "AT88CK590");
        assert_eq!(info.version_string(), "2.0.0");
    }

    #[test]
    fn test_close() {
        let (kit, wire) = connected_kit();
        kit.close();

        assert!(wire.written_text().is_empty());
        assert_eq!(wire.pending(), 0);
    }
}
