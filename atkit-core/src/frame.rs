//! ASCII frame codec
//!
//! Requests travel as `target(hexdata)\n`, replies come back as
//! `SS(HEXDATA)\n` where `SS` is a two-digit hex status code. Replies may
//! carry free text before the status (e.g. `ECC508 TWI 00(C0)`).

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};

/// Frame terminator
pub const EOP: u8 = b'\n';

/// Parsed kit reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Status code (0 = success)
    pub status: u8,

    /// Hex body between the parentheses, verbatim
    pub data: String,
}

impl Response {
    /// Check if the kit reported success
    pub fn is_success(&self) -> bool {
        self.status == 0
    }
}

/// Encode a request frame
///
/// # Examples
///
/// ```
/// use atkit_core::frame;
///
/// let bytes = frame::encode("e:t", &[1, 2, 3]);
/// assert_eq!(&bytes[..], b"e:t(010203)\n");
/// ```
pub fn encode(target: &str, payload: &[u8]) -> Bytes {
    let mut buf = BytesMut::with_capacity(target.len() + payload.len() * 2 + 3);

    buf.put_slice(target.as_bytes());
    buf.put_u8(b'(');
    buf.put_slice(hex::encode(payload).as_bytes());
    buf.put_u8(b')');
    buf.put_u8(EOP);

    buf.freeze()
}

/// Decode a reply frame
///
/// Scans left to right for the first `(` that is preceded by two hex digits
/// and followed by a `)`; the text in between is the data.
///
/// # Errors
///
/// Returns [`Error::FrameParse`] if no such pattern exists.
pub fn decode(text: &str) -> Result<Response> {
    let bytes = text.as_bytes();

    let mut open = 0;
    while let Some(pos) = bytes[open..].iter().position(|&b| b == b'(') {
        let paren = open + pos;
        open = paren + 1;

        if paren < 2 {
            continue;
        }

        let (hi, lo) = (bytes[paren - 2], bytes[paren - 1]);
        if !hi.is_ascii_hexdigit() || !lo.is_ascii_hexdigit() {
            continue;
        }

        let Some(len) = bytes[paren + 1..].iter().position(|&b| b == b')') else {
            // No closing paren anywhere after this point
            break;
        };

        let status = (nibble(hi) << 4) | nibble(lo);
        let data = text[paren + 1..paren + 1 + len].to_string();

        return Ok(Response { status, data });
    }

    Err(Error::FrameParse(text.to_string()))
}

fn nibble(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        _ => c - b'A' + 10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_transaction() {
        assert_eq!(&encode("e:t", &[1, 2, 3])[..], b"e:t(010203)\n");
    }

    #[test]
    fn test_encode_empty_payload() {
        assert_eq!(&encode("b:f", &[])[..], b"b:f()\n");
    }

    #[test]
    fn test_encode_lowercase_hex() {
        assert_eq!(&encode("b:d", &[0xAB, 0xCD])[..], b"b:d(abcd)\n");
    }

    #[test]
    fn test_encode_decode_status_target() {
        let encoded = encode("0f", &[0xDE, 0xAD]);
        let text: String = encoded.iter().map(|&b| b as char).collect();

        let response = decode(&text).unwrap();
        assert_eq!(response.status, 0x0F);
        assert_eq!(hex::decode(&response.data).unwrap(), vec![0xDE, 0xAD]);
    }

    #[test]
    fn test_decode_simple() {
        let response = decode("00(04112233aabb)\n").unwrap();
        assert_eq!(
            response,
            Response {
                status: 0,
                data: "04112233aabb".into(),
            }
        );
        assert!(response.is_success());
    }

    #[test]
    fn test_decode_with_prefix_text() {
        let response = decode("ECC508 TWI 00(C0)\n").unwrap();
        assert_eq!(response.status, 0);
        assert_eq!(response.data, "C0");
    }

    #[test]
    fn test_decode_uppercase_status() {
        let response = decode("C5()\n").unwrap();
        assert_eq!(response.status, 0xC5);
        assert_eq!(response.data, "");
    }

    #[test]
    fn test_decode_skips_non_hex_prefix() {
        // "t(" is not a status; the real status comes later
        let response = decode("e:t(zz) 0F(01)\n").unwrap();
        assert_eq!(response.status, 0x0F);
        assert_eq!(response.data, "01");
    }

    #[test]
    fn test_decode_noise_only() {
        assert!(matches!(decode("\x04\x04\x04"), Err(Error::FrameParse(_))));
    }

    #[test]
    fn test_decode_unterminated_body() {
        assert!(matches!(decode("00(0102"), Err(Error::FrameParse(_))));
    }

    #[test]
    fn test_decode_status_at_start_of_text() {
        assert!(matches!(decode("0(00)"), Err(Error::FrameParse(_))));
    }
}
