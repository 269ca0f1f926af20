//! The single-block codec.
//!
//! ## Block layout
//!
//! ```text
//! offset  size  field
//! 0       4     CRC-32C of the original bytes (LE)
//! 4       4     original length (LE)
//! 8       4     BWT primary index (LE, 0 when stored)
//! 12      1     mode: 0 = stored, 1 = BWT + MTF + range coded
//! 13      ...   payload
//! ```
//!
//! A block is stored whenever coding would not make it smaller, which keeps
//! every encoded block within [`bound`].

use crate::{bwt, model, mtf};
use oxibz3_core::{BlockCodec, Crc32c, Status, Version};
use std::cmp::Ordering;

/// Smallest block size a codec can be created with (65 KiB).
pub const BLOCK_SIZE_MIN: usize = 65 * 1024;

/// Largest block size a codec can be created with (511 MiB).
pub const BLOCK_SIZE_MAX: usize = 511 * 1024 * 1024;

/// Block size used when the caller does not choose one (16 MiB).
pub const DEFAULT_BLOCK_SIZE: usize = 16 * 1024 * 1024;

/// Length of the per-block header.
pub const HEADER_LEN: usize = 13;

/// Interface level of this codec, as checked by callers that require a
/// minimum primitive version.
pub const CODEC_VERSION: Version = Version::new(1, 5, 0);

const MODE_STORED: u8 = 0;
const MODE_CODED: u8 = 1;

/// Maximum encoded size of a block holding `input_len` original bytes.
pub const fn bound(input_len: usize) -> usize {
    input_len
        .saturating_add(input_len / 50)
        .saturating_add(32)
}

/// BWT + MTF + range coder block codec.
#[derive(Debug, Clone)]
pub struct Bz3BlockCodec {
    block_size: usize,
}

impl Bz3BlockCodec {
    /// Create a codec for blocks of up to `block_size` bytes.
    ///
    /// Fails with [`Status::InitError`] outside
    /// [`BLOCK_SIZE_MIN`]..=[`BLOCK_SIZE_MAX`].
    pub fn new(block_size: usize) -> Result<Self, Status> {
        if !(BLOCK_SIZE_MIN..=BLOCK_SIZE_MAX).contains(&block_size) {
            return Err(Status::InitError);
        }
        Ok(Self { block_size })
    }
}

impl Default for Bz3BlockCodec {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
        }
    }
}

fn read_u32(bytes: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
}

impl BlockCodec for Bz3BlockCodec {
    fn block_size(&self) -> usize {
        self.block_size
    }

    fn bound(&self, input_len: usize) -> usize {
        bound(input_len)
    }

    fn encode_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Status> {
        if input.len() > self.block_size {
            return Err(Status::DataTooBig);
        }
        if output.len() < bound(input.len()) {
            return Err(Status::OutOfBounds);
        }

        let crc = Crc32c::compute(input);
        let coded = if input.is_empty() {
            None
        } else {
            let (last, primary) = bwt::transform(input);
            let payload = model::encode(&mtf::transform(&last));
            (payload.len() < input.len()).then_some((primary, payload))
        };

        output[0..4].copy_from_slice(&crc.to_le_bytes());
        output[4..8].copy_from_slice(&(input.len() as u32).to_le_bytes());
        let body = match &coded {
            Some((primary, payload)) => {
                output[8..12].copy_from_slice(&primary.to_le_bytes());
                output[12] = MODE_CODED;
                payload.as_slice()
            }
            None => {
                output[8..12].copy_from_slice(&0u32.to_le_bytes());
                output[12] = MODE_STORED;
                input
            }
        };
        let end = HEADER_LEN + body.len();
        output[HEADER_LEN..end].copy_from_slice(body);

        Ok(end)
    }

    fn decode_block(&mut self, input: &[u8], output: &mut [u8]) -> Result<usize, Status> {
        if input.len() < HEADER_LEN {
            return Err(Status::MalformedHeader);
        }
        let crc = read_u32(input, 0);
        let original = read_u32(input, 4) as usize;
        let primary = read_u32(input, 8);
        let mode = input[12];
        let body = &input[HEADER_LEN..];

        if mode != MODE_STORED && mode != MODE_CODED {
            return Err(Status::MalformedHeader);
        }
        if original > self.block_size {
            return Err(Status::DataTooBig);
        }
        if original > output.len() {
            return Err(Status::OutOfBounds);
        }

        if mode == MODE_STORED {
            match body.len().cmp(&original) {
                Ordering::Less => return Err(Status::TruncatedData),
                Ordering::Greater => return Err(Status::MalformedHeader),
                Ordering::Equal => {}
            }
            if Crc32c::compute(body) != crc {
                return Err(Status::CrcMismatch);
            }
            output[..original].copy_from_slice(body);
            return Ok(original);
        }

        if original == 0 {
            return Err(Status::MalformedHeader);
        }
        if primary as usize >= original {
            return Err(Status::BwtError);
        }
        let symbols = model::decode(body, original)?;
        let decoded = bwt::inverse_transform(&mtf::inverse_transform(&symbols), primary)?;

        if Crc32c::compute(&decoded) != crc {
            return Err(Status::CrcMismatch);
        }
        output[..original].copy_from_slice(&decoded);
        Ok(original)
    }

    fn version(&self) -> Version {
        CODEC_VERSION
    }
}
