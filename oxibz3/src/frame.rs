//! Raw frame format: exactly one encoded block, nothing around it.
//!
//! A frame carries no sizes of its own, so the decoder needs a capacity up
//! front: `max_output_size` when given, the block size otherwise. Container
//! bytes handed to the frame decoder are rejected by the block codec.

use crate::options::{DecodeOptions, EncodeOptions};
use crate::processor::BlockProcessor;
use oxibz3_core::{Bz3Error, Result, buffer};
use tracing::trace;

/// Decode a frame and append the result to `dest`; returns the bytes
/// appended.
pub fn decode_frame_into(source: &[u8], dest: &mut Vec<u8>, options: &DecodeOptions) -> Result<usize> {
    let block_size = options.validate()?;
    let capacity = options.max_output_size.unwrap_or(block_size);
    let mut processor = BlockProcessor::new(block_size)?;
    let written = processor.decode_block(source, dest, capacity)?;
    trace!(compressed = source.len(), original = written, "decoded frame");
    Ok(written)
}

/// Encode `source` as a single frame appended to `dest`; returns the bytes
/// appended.
///
/// `source` must fit in one block.
pub fn encode_frame_into(source: &[u8], dest: &mut Vec<u8>, options: &EncodeOptions) -> Result<usize> {
    let block_size = options.validate()?;
    let mut processor = BlockProcessor::new(block_size)?;
    let start = dest.len();
    let written = processor.encode_block(source, dest)?;
    if let Some(limit) = options.max_output_size {
        if written > limit {
            buffer::truncate(dest, start);
            return Err(Bz3Error::OutputLimitExceeded { limit });
        }
    }
    trace!(original = source.len(), compressed = written, "encoded frame");
    Ok(written)
}
