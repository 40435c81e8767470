//! P-256 public keys returned by GenKey

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{Error, Result};

/// SubjectPublicKeyInfo header for an uncompressed P-256 point
const SPKI_P256_PREFIX: [u8; 27] = [
    0x30, 0x59, 0x30, 0x13, 0x06, 0x07, 0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01, 0x06, 0x08,
    0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07, 0x03, 0x42, 0x00, 0x04,
];

/// Raw public key: X and Y coordinates, 32 bytes each
#[derive(Clone, PartialEq, Eq)]
pub struct PublicKey {
    bytes: [u8; 64],
}

impl PublicKey {
    pub const SIZE: usize = 64;

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; 64] = bytes.try_into().map_err(|_| {
            Error::Validation(format!(
                "Public key must be {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            ))
        })?;

        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }

    pub fn x(&self) -> &[u8] {
        &self.bytes[..32]
    }

    pub fn y(&self) -> &[u8] {
        &self.bytes[32..]
    }

    /// DER-encoded SubjectPublicKeyInfo
    pub fn to_der(&self) -> Vec<u8> {
        let mut der = Vec::with_capacity(SPKI_P256_PREFIX.len() + Self::SIZE);
        der.extend_from_slice(&SPKI_P256_PREFIX);
        der.extend_from_slice(&self.bytes);
        der
    }

    /// PEM `PUBLIC KEY` block around [`Self::to_der`], 64 columns wide
    pub fn to_pem(&self) -> String {
        let encoded = STANDARD.encode(self.to_der());

        let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
        for line in encoded.as_bytes().chunks(64) {
            // base64 output is ASCII
            pem.extend(line.iter().map(|&b| char::from(b)));
            pem.push('\n');
        }
        pem.push_str("-----END PUBLIC KEY-----\n");
        pem
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(&self.bytes[..8]))
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.bytes))
    }
}
