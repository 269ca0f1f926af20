//! Wire-level constants and headers of the container format.
//!
//! ```text
//! unit header   : "BZ3v1" | block_size u32le                      (9 bytes)
//! block record  : compressed_size u32le | original_size u32le     (8 bytes)
//!                 payload[compressed_size]
//! ```
//!
//! A container stream is one or more units back to back; a unit is a header
//! followed by zero or more block records.

use oxibz3_block::{BLOCK_SIZE_MAX, BLOCK_SIZE_MIN, bound};
use oxibz3_core::{Bz3Error, Result};

/// Unit signature.
pub const SIGNATURE: [u8; 5] = *b"BZ3v1";

/// Length of a unit header.
pub const UNIT_HEADER_LEN: usize = 9;

/// Length of a block record header.
pub const RECORD_HEADER_LEN: usize = 8;

/// Which layout a byte sequence uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Format {
    /// Multi-block container: unit headers and block records.
    #[default]
    File,
    /// Exactly one block payload with no outer header.
    Frame,
}

impl Format {
    /// Lowercase name, as used in messages.
    pub const fn name(self) -> &'static str {
        match self {
            Format::File => "file",
            Format::Frame => "frame",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Bring a requested encode block size into range.
///
/// Sizes below the minimum are raised to it; sizes above the maximum are an
/// error.
pub fn normalize_block_size(block_size: usize) -> Result<usize> {
    if block_size > BLOCK_SIZE_MAX {
        return Err(Bz3Error::invalid_argument(format!(
            "block size {} out of range (expect ..={})",
            block_size, BLOCK_SIZE_MAX
        )));
    }
    Ok(block_size.max(BLOCK_SIZE_MIN))
}

/// Whether `bytes` starts with the unit signature.
pub fn has_signature(bytes: &[u8]) -> bool {
    bytes.len() >= SIGNATURE.len() && bytes[..SIGNATURE.len()] == SIGNATURE
}

/// A parsed unit header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitHeader {
    /// Largest original block size used in this unit.
    pub block_size: usize,
}

impl UnitHeader {
    /// Parse a unit header found at `offset`.
    ///
    /// The caller has already matched the signature.
    pub fn parse(bytes: &[u8; UNIT_HEADER_LEN], offset: u64) -> Result<Self> {
        let block_size = u32::from_le_bytes([bytes[5], bytes[6], bytes[7], bytes[8]]) as usize;
        if !(BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX).contains(&block_size) {
            return Err(Bz3Error::malformed(
                offset,
                format!("unit block size {} out of range", block_size),
            ));
        }
        Ok(Self { block_size })
    }

    /// Serialize this header.
    pub fn to_bytes(self) -> [u8; UNIT_HEADER_LEN] {
        let mut out = [0u8; UNIT_HEADER_LEN];
        out[..5].copy_from_slice(&SIGNATURE);
        out[5..].copy_from_slice(&(self.block_size as u32).to_le_bytes());
        out
    }
}

/// A parsed block record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Payload length in the stream.
    pub compressed_size: usize,
    /// Length after decoding.
    pub original_size: usize,
}

impl RecordHeader {
    /// Parse a record header at `offset` belonging to a unit with
    /// `block_size`, rejecting sizes no encoder could have produced.
    pub fn parse(bytes: &[u8; RECORD_HEADER_LEN], offset: u64, block_size: usize) -> Result<Self> {
        let compressed_size = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]) as usize;
        let original_size = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]) as usize;

        if original_size > block_size {
            return Err(Bz3Error::malformed(
                offset,
                format!(
                    "original size {} exceeds unit block size {}",
                    original_size, block_size
                ),
            ));
        }
        if compressed_size > bound(original_size) {
            return Err(Bz3Error::malformed(
                offset,
                format!(
                    "compressed size {} exceeds bound {} for {} bytes",
                    compressed_size,
                    bound(original_size),
                    original_size
                ),
            ));
        }

        Ok(Self {
            compressed_size,
            original_size,
        })
    }

    /// Serialize this header.
    pub fn to_bytes(self) -> [u8; RECORD_HEADER_LEN] {
        let mut out = [0u8; RECORD_HEADER_LEN];
        out[..4].copy_from_slice(&(self.compressed_size as u32).to_le_bytes());
        out[4..].copy_from_slice(&(self.original_size as u32).to_le_bytes());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_block_size() {
        assert_eq!(normalize_block_size(1).unwrap(), BLOCK_SIZE_MIN);
        assert_eq!(normalize_block_size(1 << 20).unwrap(), 1 << 20);
        assert_eq!(normalize_block_size(BLOCK_SIZE_MAX).unwrap(), BLOCK_SIZE_MAX);
        assert!(matches!(
            normalize_block_size(BLOCK_SIZE_MAX + 1),
            Err(Bz3Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_unit_header() {
        let header = UnitHeader {
            block_size: 1 << 20,
        };
        let bytes = header.to_bytes();
        assert_eq!(&bytes, b"BZ3v1\x00\x00\x10\x00");
        assert!(has_signature(&bytes));
        assert_eq!(UnitHeader::parse(&bytes, 0).unwrap(), header);

        let mut small = bytes;
        small[5..].copy_from_slice(&1024u32.to_le_bytes());
        assert!(matches!(
            UnitHeader::parse(&small, 7),
            Err(Bz3Error::MalformedContainer { offset: 7, .. })
        ));
    }

    #[test]
    fn test_record_header_limits() {
        let ok = RecordHeader {
            compressed_size: 50,
            original_size: 100,
        };
        assert_eq!(RecordHeader::parse(&ok.to_bytes(), 9, 1 << 20).unwrap(), ok);

        let too_long = RecordHeader {
            compressed_size: 10,
            original_size: (1 << 20) + 1,
        };
        assert!(RecordHeader::parse(&too_long.to_bytes(), 9, 1 << 20).is_err());

        let over_bound = RecordHeader {
            compressed_size: bound(100) + 1,
            original_size: 100,
        };
        assert!(RecordHeader::parse(&over_bound.to_bytes(), 9, 1 << 20).is_err());
    }

    #[test]
    fn test_has_signature() {
        assert!(!has_signature(b"BZ3v"));
        assert!(!has_signature(b"BZh91AY&SY"));
        assert!(has_signature(b"BZ3v1garbage"));
    }
}
