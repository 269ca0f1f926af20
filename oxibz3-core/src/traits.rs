//! The block codec seam.
//!
//! Everything above the primitive talks to it through [`BlockCodec`]: one
//! block in, one block out, a caller-provided output slice, and a [`Status`]
//! on failure.

use crate::version::Version;
use std::fmt;

/// Failure status reported by a block codec.
///
/// The integer codes match the external primitive interface; `0` is success
/// and has no variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The output slice is too small, or an index points outside the block.
    OutOfBounds,
    /// The Burrows-Wheeler primary index is invalid.
    BwtError,
    /// The block checksum does not match the decoded data.
    CrcMismatch,
    /// The block header cannot be parsed.
    MalformedHeader,
    /// The block payload ends early.
    TruncatedData,
    /// The block is larger than the codec's block size.
    DataTooBig,
    /// The codec state could not be created.
    InitError,
}

impl Status {
    /// All statuses, in code order.
    pub const ALL: [Status; 7] = [
        Status::OutOfBounds,
        Status::BwtError,
        Status::CrcMismatch,
        Status::MalformedHeader,
        Status::TruncatedData,
        Status::DataTooBig,
        Status::InitError,
    ];

    /// Integer code of this status.
    pub const fn code(self) -> i32 {
        match self {
            Status::OutOfBounds => -1,
            Status::BwtError => -2,
            Status::CrcMismatch => -3,
            Status::MalformedHeader => -4,
            Status::TruncatedData => -5,
            Status::DataTooBig => -6,
            Status::InitError => -7,
        }
    }

    /// Symbolic name of this status.
    pub const fn name(self) -> &'static str {
        match self {
            Status::OutOfBounds => "BZ3_ERR_OUT_OF_BOUNDS",
            Status::BwtError => "BZ3_ERR_BWT",
            Status::CrcMismatch => "BZ3_ERR_CRC",
            Status::MalformedHeader => "BZ3_ERR_MALFORMED_HEADER",
            Status::TruncatedData => "BZ3_ERR_TRUNCATED_DATA",
            Status::DataTooBig => "BZ3_ERR_DATA_TOO_BIG",
            Status::InitError => "BZ3_ERR_INIT",
        }
    }
}

impl TryFrom<i32> for Status {
    type Error = i32;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Status::ALL
            .iter()
            .copied()
            .find(|status| status.code() == code)
            .ok_or(code)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::error::Error for Status {}

/// A single-block compression primitive.
///
/// Implementations own whatever state the algorithm needs for one block size.
/// Neither method grows its output; callers size `output` beforehand using
/// [`BlockCodec::bound`] (encode) or the known original size (decode).
pub trait BlockCodec {
    /// Largest original block this codec accepts.
    fn block_size(&self) -> usize;

    /// Maximum encoded size of an input of `input_len` bytes.
    fn bound(&self, input_len: usize) -> usize;

    /// Encode one block.
    ///
    /// # Arguments
    ///
    /// * `input` - Original bytes, at most [`BlockCodec::block_size`] long
    /// * `output` - Destination, at least `bound(input.len())` bytes
    ///
    /// # Returns
    ///
    /// Number of bytes written to `output`.
    fn encode_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Status>;

    /// Decode one block.
    ///
    /// # Arguments
    ///
    /// * `input` - One encoded block, exactly as produced by `encode_block`
    /// * `output` - Destination sized for the original data
    ///
    /// # Returns
    ///
    /// Number of bytes written to `output`.
    fn decode_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Status>;

    /// Version of the codec implementation.
    fn version(&self) -> Version;
}

impl<C: BlockCodec + ?Sized> BlockCodec for Box<C> {
    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn bound(&self, input_len: usize) -> usize {
        (**self).bound(input_len)
    }

    fn encode_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Status> {
        (**self).encode_block(input, output)
    }

    fn decode_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Status> {
        (**self).decode_block(input, output)
    }

    fn version(&self) -> Version {
        (**self).version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::OutOfBounds.code(), -1);
        assert_eq!(Status::InitError.code(), -7);
        for status in Status::ALL {
            assert_eq!(Status::try_from(status.code()), Ok(status));
        }
        assert_eq!(Status::try_from(0), Err(0));
        assert_eq!(Status::try_from(-8), Err(-8));
    }

    #[test]
    fn test_status_names_distinct() {
        let mut names: Vec<_> = Status::ALL.iter().map(|s| s.to_string()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 7);
        assert_eq!(Status::TruncatedData.to_string(), "BZ3_ERR_TRUNCATED_DATA");
    }
}
