//! Platform configuration service: where ACPI table bytes come from.
//!
//! ConfigService -> one query per table kind + release.
//! AcpiTable      -> validated, owned table bytes (common header decoded only).
//! FirmwareTables -> directory-backed service (sysfs by default).
//!
use std::{fmt, io, path::PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::cmd::category::Category;

pub mod sysfs;

pub use sysfs::FirmwareTables;

/// Length of the common ACPI system description table header.
pub const SDT_HEADER_LEN: usize = 36;

/// Failure retrieving one table.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The platform does not publish this table
    #[error("table not found")]
    NotFound,

    /// The table exists but could not be read
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bytes read do not form a valid table
    #[error("malformed {signature} table: {reason}")]
    Malformed { signature: String, reason: String },
}

impl QueryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotFound)
    }
}

/// Decoded common header shared by every ACPI description table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SdtHeader {
    pub signature: String,
    pub length: u32,
    pub revision: u8,
    pub checksum: u8,
    pub oem_id: String,
    pub oem_table_id: String,
    pub oem_revision: u32,
    pub creator_id: String,
    pub creator_revision: u32,
}

impl SdtHeader {
    /// Decode the first [`SDT_HEADER_LEN`] bytes. Caller guarantees the length.
    fn decode(raw: &[u8]) -> Self {
        let u32_at = |off: usize| {
            u32::from_le_bytes([raw[off], raw[off + 1], raw[off + 2], raw[off + 3]])
        };
        SdtHeader {
            signature: ascii(&raw[0..4]),
            length: u32_at(4),
            revision: raw[8],
            checksum: raw[9],
            oem_id: ascii(&raw[10..16]),
            oem_table_id: ascii(&raw[16..24]),
            oem_revision: u32_at(24),
            creator_id: ascii(&raw[28..32]),
            creator_revision: u32_at(32),
        }
    }
}

/// Printable form of a fixed-width ACPI id field (NUL/space padded).
fn ascii(bytes: &[u8]) -> String {
    let end = bytes
        .iter()
        .rposition(|&b| b != 0 && b != b' ')
        .map_or(0, |i| i + 1);
    bytes[..end]
        .iter()
        .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
        .collect()
}

/// An owned, validated ACPI table as handed out by a [`ConfigService`].
#[derive(Clone, PartialEq, Eq)]
pub struct AcpiTable {
    header: SdtHeader,
    bytes: Vec<u8>,
}

impl AcpiTable {
    /// Validate `bytes` as a table carrying `expected` as its signature.
    ///
    /// Trailing bytes past the declared length are dropped.
    pub fn from_bytes(expected: [u8; 4], mut bytes: Vec<u8>) -> Result<Self, QueryError> {
        let sig = String::from_utf8_lossy(&expected).into_owned();
        let malformed = |reason: String| QueryError::Malformed {
            signature: sig.clone(),
            reason,
        };

        if bytes.len() < SDT_HEADER_LEN {
            return Err(malformed(format!(
                "{} bytes is shorter than the {SDT_HEADER_LEN} byte header",
                bytes.len()
            )));
        }
        if bytes[0..4] != expected {
            return Err(malformed(format!(
                "unexpected signature '{}'",
                String::from_utf8_lossy(&bytes[0..4])
            )));
        }

        let header = SdtHeader::decode(&bytes);
        let declared = header.length as usize;
        if declared < SDT_HEADER_LEN || declared > bytes.len() {
            return Err(malformed(format!(
                "declared length {declared} does not fit {} bytes read",
                bytes.len()
            )));
        }
        bytes.truncate(declared);

        let sum = bytes.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        if sum != 0 {
            return Err(malformed(format!("checksum mismatch (byte sum 0x{sum:02x})")));
        }

        Ok(AcpiTable { header, bytes })
    }

    pub fn header(&self) -> &SdtHeader {
        &self.header
    }

    /// Table-specific bytes following the common header.
    pub fn body(&self) -> &[u8] {
        &self.bytes[SDT_HEADER_LEN..]
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Debug for AcpiTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AcpiTable")
            .field("signature", &self.header.signature)
            .field("length", &self.bytes.len())
            .finish()
    }
}

/// Source of NVDIMM related ACPI tables.
pub trait ConfigService {
    /// NVDIMM Firmware Interface Table (NFIT)
    fn primary_interface_table(&self) -> Result<AcpiTable, QueryError>;

    /// Platform Configuration Attributes Table (PCAT)
    fn platform_attributes_table(&self) -> Result<AcpiTable, QueryError>;

    /// Platform Memory Topology Table (PMTT)
    fn topology_table(&self) -> Result<AcpiTable, QueryError>;

    /// Give a table back once it has been formatted.
    fn release(&self, table: AcpiTable) {
        drop(table);
    }

    /// Query the table for `category`.
    fn retrieve(&self, category: Category) -> Result<AcpiTable, QueryError> {
        match category {
            Category::Nfit => self.primary_interface_table(),
            Category::Pcat => self.platform_attributes_table(),
            Category::Pmtt => self.topology_table(),
        }
    }
}

/// Build a syntactically valid table (checksum fixed up) for tests.
#[cfg(test)]
pub(crate) fn table_bytes(signature: [u8; 4], body: &[u8]) -> Vec<u8> {
    let len = (SDT_HEADER_LEN + body.len()) as u32;
    let mut raw = Vec::with_capacity(len as usize);
    raw.extend_from_slice(&signature);
    raw.extend_from_slice(&len.to_le_bytes());
    raw.push(1); // revision
    raw.push(0); // checksum, patched below
    raw.extend_from_slice(b"INTEL ");
    raw.extend_from_slice(b"PURLEY\0\0");
    raw.extend_from_slice(&3u32.to_le_bytes());
    raw.extend_from_slice(b"INTL");
    raw.extend_from_slice(&0x2018_0101u32.to_le_bytes());
    raw.extend_from_slice(body);
    let sum = raw.iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    raw[9] = 0u8.wrapping_sub(sum);
    raw
}
