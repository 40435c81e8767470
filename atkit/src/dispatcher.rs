//! Command dispatch over the kit transport
//!
//! Every request is one frame write followed by exactly one blocking read.
//! Nothing is retried here; failures go straight back to the caller.

use bytes::Bytes;
use tracing::{debug, trace};

use atkit_core::{constants::target, frame, CommandPacket, Response, ResponsePayload};
use atkit_transport::{HidTransport, ReportDevice};

use crate::error::{Error, Result};

/// Builds command packets and exchanges them with the kit
pub struct CommandDispatcher<D: ReportDevice> {
    transport: HidTransport<D>,
}

impl<D: ReportDevice> CommandDispatcher<D> {
    pub fn new(transport: HidTransport<D>) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &HidTransport<D> {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut HidTransport<D> {
        &mut self.transport
    }

    /// Send one frame on `channel` and read back the raw reply text
    pub fn exchange(&mut self, channel: &str, payload: &[u8], timeout_ms: u32) -> Result<String> {
        let request = frame::encode(channel, payload);
        self.transport.write(&request)?;

        let reply = self.transport.read(timeout_ms)?;
        trace!("Reply on {}: {:?}", channel, reply);

        Ok(reply)
    }

    /// Execute a secure-element command and return the parsed reply
    ///
    /// The status is not checked; see [`Self::send_command_and_unwrap`].
    pub fn send_command(
        &mut self,
        opcode: u8,
        param1: u8,
        param2: u16,
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<Response> {
        let packet = CommandPacket::with_data(opcode, param1, param2, Bytes::copy_from_slice(data));
        debug!("Sending {}", packet);

        let encoded = packet.encode()?;
        let reply = self.exchange(target::TRANSACTION, &encoded, timeout_ms)?;

        Ok(frame::decode(&reply)?)
    }

    /// Execute a command and return its payload
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceStatus`] if the reply status is non-zero.
    pub fn send_command_and_unwrap(
        &mut self,
        opcode: u8,
        param1: u8,
        param2: u16,
        data: &[u8],
        timeout_ms: u32,
    ) -> Result<Bytes> {
        let response = self.send_command(opcode, param1, param2, data, timeout_ms)?;

        if !response.is_success() {
            debug!(
                opcode = format!("0x{:02X}", opcode),
                status = format!("0x{:02X}", response.status),
                "Command failed"
            );
            return Err(Error::DeviceStatus {
                opcode,
                param1,
                param2,
                status: response.status,
            });
        }

        let body = ResponsePayload::from_hex(&response.data)?;
        if body.crc.is_some() && !body.crc_matches() {
            debug!("Reply CRC does not match for opcode 0x{:02X}", opcode);
        }

        Ok(body.into_payload())
    }

    /// Ask the kit for the address of the device at `index`
    pub fn list(&mut self, index: u8, timeout_ms: u32) -> Result<u8> {
        let reply = self.exchange(target::DISCOVER, &[index], timeout_ms)?;
        let response = frame::decode(&reply)?;

        if !response.is_success() {
            return Err(Error::KitStatus {
                target: target::DISCOVER,
                status: response.status,
            });
        }

        let address = u8::from_str_radix(response.data.trim(), 16)
            .map_err(|_| atkit_core::Error::InvalidAddressReply(response.data.clone()))?;

        debug!("Device {} at address 0x{:02X}", index, address);
        Ok(address)
    }

    /// Select the device at `address`; returns the raw acknowledgment
    pub fn select(&mut self, address: u8, timeout_ms: u32) -> Result<String> {
        self.exchange(target::SELECT, &[address], timeout_ms)
    }

    /// Query kit information; the raw reply is returned for the caller to interpret
    pub fn info(&mut self, param1: u8, timeout_ms: u32) -> Result<String> {
        self.exchange(target::INFO, &[param1], timeout_ms)
    }

    /// Run a kit application command
    pub fn app_command(&mut self, payload: &[u8], timeout_ms: u32) -> Result<Response> {
        let reply = self.exchange(target::APP, payload, timeout_ms)?;
        Ok(frame::decode(&reply)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atkit_core::{crc, Opcode};
    use atkit_transport::MockDevice;
    use pretty_assertions::assert_eq;

    fn dispatcher() -> (CommandDispatcher<MockDevice>, MockDevice) {
        let device = MockDevice::new();
        let wire = device.clone();
        (CommandDispatcher::new(HidTransport::new(device)), wire)
    }

    #[test]
    fn test_read_command_wire_bytes() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_response(0x00, &[0, 0, 0, 0]);

        dispatcher
            .send_command(Opcode::Read.into(), 0, 0x0000, &[], 1000)
            .unwrap();

        let crc = crc::compute(&[0x07, 0x02, 0x00, 0x00, 0x00]);
        let frame = format!("e:t(0702000000{})\n", hex::encode(crc));

        let mut expected = vec![0x00];
        expected.extend_from_slice(frame.as_bytes());
        expected.resize(65, 0x04);

        let written = wire.written();
        let reports = written.lock();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0], expected);
    }

    #[test]
    fn test_read_command_reference_frame() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_response(0x00, &[0, 0, 0, 0]);

        dispatcher.send_command(0x02, 0, 0x0000, &[], 1000).unwrap();

        // CRC-16/ARC of 07 02 00 00 00 is 0x78B4, reversed 0x2D1E
        assert_eq!(wire.written_text(), "e:t(07020000001e2d)\n");
    }

    #[test]
    fn test_send_command_returns_raw_response() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_reply("0F(0411223344)\n");

        let response = dispatcher.send_command(0x02, 0, 0, &[], 1000).unwrap();
        assert_eq!(response.status, 0x0F);
        assert_eq!(response.data, "0411223344");
    }

    #[test]
    fn test_unwrap_strips_count_and_crc() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_response(0x00, &[0xAA, 0xBB, 0xCC, 0xDD]);

        let payload = dispatcher
            .send_command_and_unwrap(0x02, 0, 0, &[], 1000)
            .unwrap();

        assert_eq!(&payload[..], &[0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn test_unwrap_status_failure() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_reply("0F()\n");

        let err = dispatcher
            .send_command_and_unwrap(0x12, 2, 0x0008, &[1, 2, 3, 4], 1000)
            .unwrap_err();

        assert!(matches!(
            err,
            Error::DeviceStatus {
                opcode: 0x12,
                param1: 2,
                param2: 0x0008,
                status: 0x0F,
            }
        ));
        assert_eq!(err.status(), Some(0x0F));
    }

    #[test]
    fn test_unparseable_reply() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_reply("garbage\n");

        let err = dispatcher.send_command(0x02, 0, 0, &[], 1000).unwrap_err();
        assert!(matches!(err, Error::Core(atkit_core::Error::FrameParse(_))));
    }

    #[test]
    fn test_timeout_surfaces() {
        let (mut dispatcher, _wire) = dispatcher();

        let err = dispatcher.send_command(0x02, 0, 0, &[], 10).unwrap_err();
        assert!(err.is_timeout());
    }

    #[test]
    fn test_list_parses_address() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_reply("ECC508 TWI 00(C0)\n");

        assert_eq!(dispatcher.list(0, 0).unwrap(), 0xC0);
        assert_eq!(wire.written_text(), "b:d(00)\n");
    }

    #[test]
    fn test_list_no_device() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_reply("no_device C5()\n");

        let err = dispatcher.list(0, 0).unwrap_err();
        assert!(matches!(err, Error::KitStatus { status: 0xC5, .. }));
    }

    #[test]
    fn test_select_returns_raw_ack() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_reply("00()\n");

        assert_eq!(dispatcher.select(0xC0, 0).unwrap(), "00()\n");
        assert_eq!(wire.written_text(), "e:p:s(c0)\n");
    }

    #[test]
    fn test_info_returns_raw_reply() {
        let (mut dispatcher, mut wire) = dispatcher();
        wire.push_reply("AT88CK590 00(020000)\n");

        assert_eq!(dispatcher.info(0, 0).unwrap(), "AT88CK590 00(020000)\n");
        assert_eq!(wire.written_text(), "b:f(00)\n");
    }
}
