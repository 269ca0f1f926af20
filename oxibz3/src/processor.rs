//! Adapter between the framing layer and a [`BlockCodec`].
//!
//! The processor owns the codec state for one block size and runs the
//! grow → call → truncate sequence so callers only ever see the bytes a
//! codec actually produced, appended to their own `Vec<u8>`.

use crate::format::normalize_block_size;
use crate::version;
use oxibz3_block::Bz3BlockCodec;
use oxibz3_core::{BlockCodec, Result, Version, buffer};

/// Block encoder/decoder for one block size.
///
/// # Example
///
/// ```
/// use oxibz3::BlockProcessor;
///
/// let mut processor = BlockProcessor::new(1 << 20).unwrap();
/// let mut block = Vec::new();
/// processor.encode_block(b"hello, hello, hello", &mut block).unwrap();
///
/// let mut out = Vec::new();
/// let n = processor.decode_block(&block, &mut out, 19).unwrap();
/// assert_eq!(n, 19);
/// assert_eq!(out, b"hello, hello, hello");
/// ```
pub struct BlockProcessor {
    codec: Box<dyn BlockCodec + Send>,
}

impl std::fmt::Debug for BlockProcessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockProcessor")
            .field("block_size", &self.codec.block_size())
            .field("version", &self.codec.version())
            .finish()
    }
}

impl BlockProcessor {
    /// Create a processor around the built-in codec.
    ///
    /// `block_size` is raised to the minimum if smaller; above the maximum it
    /// is an `InvalidArgument` error.
    pub fn new(block_size: usize) -> Result<Self> {
        let block_size = normalize_block_size(block_size)?;
        Self::with_codec(Bz3BlockCodec::new(block_size)?)
    }

    /// Create a processor around any codec, subject to the version gate.
    pub fn with_codec<C>(codec: C) -> Result<Self>
    where
        C: BlockCodec + Send + 'static,
    {
        version::check(codec.version())?;
        Ok(Self {
            codec: Box::new(codec),
        })
    }

    /// Largest original block accepted.
    pub fn block_size(&self) -> usize {
        self.codec.block_size()
    }

    /// Maximum encoded size for `input_len` original bytes.
    pub fn bound(&self, input_len: usize) -> usize {
        self.codec.bound(input_len)
    }

    /// Version reported by the codec.
    pub fn version(&self) -> Version {
        self.codec.version()
    }

    /// Encode `src` as one block and append it to `dest`.
    ///
    /// Returns the number of bytes appended. On error `dest` is left as it
    /// was.
    pub fn encode_block(&mut self, src: &[u8], dest: &mut Vec<u8>) -> Result<usize> {
        let start = dest.len();
        buffer::grow(dest, start + self.codec.bound(src.len()));
        match self.codec.encode_block(src, &mut dest[start..]) {
            Ok(written) => {
                buffer::truncate(dest, start + written);
                Ok(written)
            }
            Err(status) => {
                buffer::truncate(dest, start);
                Err(status.into())
            }
        }
    }

    /// Decode one block into at most `capacity` bytes appended to `dest`.
    ///
    /// Returns the number of bytes appended. On error `dest` is left as it
    /// was.
    pub fn decode_block(&mut self, src: &[u8], dest: &mut Vec<u8>, capacity: usize) -> Result<usize> {
        let start = dest.len();
        buffer::grow(dest, start + capacity);
        match self.codec.decode_block(src, &mut dest[start..]) {
            Ok(written) => {
                buffer::truncate(dest, start + written);
                Ok(written)
            }
            Err(status) => {
                buffer::truncate(dest, start);
                Err(status.into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxibz3_block::{BLOCK_SIZE_MAX, BLOCK_SIZE_MIN};
    use oxibz3_core::{Bz3Error, Status};

    /// Codec that always fails with a fixed status.
    struct Failing(Status, Version);

    impl BlockCodec for Failing {
        fn block_size(&self) -> usize {
            BLOCK_SIZE_MIN
        }

        fn bound(&self, input_len: usize) -> usize {
            input_len + 64
        }

        fn encode_block(&mut self, _: &[u8], _: &mut [u8]) -> std::result::Result<usize, Status> {
            Err(self.0)
        }

        fn decode_block(&mut self, _: &[u8], _: &mut [u8]) -> std::result::Result<usize, Status> {
            Err(self.0)
        }

        fn version(&self) -> Version {
            self.1
        }
    }

    #[test]
    fn test_block_size_clamped() {
        assert_eq!(BlockProcessor::new(1).unwrap().block_size(), BLOCK_SIZE_MIN);
        assert!(matches!(
            BlockProcessor::new(BLOCK_SIZE_MAX + 1),
            Err(Bz3Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_appends_after_existing_content() {
        let mut processor = BlockProcessor::new(BLOCK_SIZE_MIN).unwrap();
        let data = b"abcabcabcabcabcabcabcabcabcabcabcabc";

        let mut block = b"prefix".to_vec();
        let n = processor.encode_block(data, &mut block).unwrap();
        assert_eq!(&block[..6], b"prefix");
        assert_eq!(block.len(), 6 + n);
        assert!(n <= processor.bound(data.len()));

        let mut out = b"out:".to_vec();
        let m = processor.decode_block(&block[6..], &mut out, data.len()).unwrap();
        assert_eq!(m, data.len());
        assert_eq!(&out[4..], data);
    }

    #[test]
    fn test_each_status_surfaces_distinctly() {
        for status in Status::ALL {
            let mut processor = BlockProcessor::with_codec(Failing(status, Version::new(2, 0, 0)))
                .unwrap();
            let mut dest = b"keep".to_vec();
            let err = processor.encode_block(b"x", &mut dest).unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(dest, b"keep");

            let err = processor.decode_block(b"x", &mut dest, 10).unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(dest, b"keep");
        }
    }

    #[test]
    fn test_version_gate_on_old_codec() {
        let err = BlockProcessor::with_codec(Failing(Status::InitError, Version::new(1, 3, 1)))
            .unwrap_err();
        assert!(matches!(err, Bz3Error::IncompatibleVersion { .. }));
    }

    #[test]
    fn test_decode_capacity_too_small() {
        let mut processor = BlockProcessor::new(BLOCK_SIZE_MIN).unwrap();
        let mut block = Vec::new();
        processor.encode_block(&[7u8; 1000], &mut block).unwrap();

        let mut out = Vec::new();
        let err = processor.decode_block(&block, &mut out, 999).unwrap_err();
        assert_eq!(err.status(), Some(Status::OutOfBounds));
        assert!(out.is_empty());
    }
}
