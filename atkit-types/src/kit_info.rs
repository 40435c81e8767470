//! Kit firmware information

use std::fmt;

use crate::error::{Error, Result};

/// Reply to a `b:f` info request
///
/// The kit answers with its name followed by a status/version frame, e.g.
/// `AT88CK590 00(010203)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitInfo {
    /// Kit name (first space-separated token of the reply)
    pub kit_name: String,

    /// Status code of the reply
    pub status: u8,

    /// Version bytes
    pub version: Vec<u8>,

    /// Reply text as received
    pub raw: String,
}

impl KitInfo {
    /// Build from the raw reply text and its decoded status/data
    pub fn new(raw: impl Into<String>, status: u8, data: &str) -> Result<Self> {
        let raw = raw.into();

        let kit_name = raw
            .split(' ')
            .next()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| Error::Parse(format!("No kit name in reply {:?}", raw)))?
            .to_string();

        let version = hex::decode(data)
            .map_err(|e| Error::Parse(format!("Invalid version bytes {:?}: {}", data, e)))?;

        Ok(Self {
            kit_name,
            status,
            version,
            raw,
        })
    }

    /// Dotted version, e.g. `2.0.0`
    pub fn version_string(&self) -> String {
        self.version
            .iter()
            .map(u8::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for KitInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Kit[{}, v{}]", self.kit_name, self.version_string())
    }
}
