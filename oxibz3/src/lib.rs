//! # OxiBz3
//!
//! Pure Rust bzip3-style framing: a multi-block container format, a raw
//! single-block frame format, streaming sessions and one-shot helpers, on
//! top of the block codec in `oxibz3-block`.
//!
//! ## Container layout
//!
//! ```text
//! ┌───────────────────────────┬──────────────────────────────┬─────┐
//! │ "BZ3v1" │ block_size u32  │ packed u32 │ orig u32 │ data │ ... │
//! └───────────────────────────┴──────────────────────────────┴─────┘
//!            unit header                 block record
//! ```
//!
//! Units can be concatenated (`cat a.bz3 b.bz3`); by default all of them are
//! decoded in order, with [`DecodeOptions::concat`] off only the first.
//!
//! ## One-shot
//!
//! ```rust
//! use oxibz3::{DecodeOptions, EncodeOptions, decode, encode};
//!
//! let data = b"123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ\n";
//! let packed = encode(data, &EncodeOptions::new().with_block_size(1 << 20)).unwrap();
//! assert!(packed.starts_with(b"BZ3v1"));
//! assert_eq!(decode(&packed, &DecodeOptions::new()).unwrap(), data);
//! ```
//!
//! ## Streaming
//!
//! ```rust
//! use oxibz3::{Decoder, DecodeOptions, Encoder, EncodeOptions};
//! use std::io::Read;
//!
//! let mut encoder = Encoder::new(Vec::new(), EncodeOptions::new()).unwrap();
//! encoder.write(b"streamed ").unwrap();
//! encoder.write(b"bytes").unwrap();
//! let packed = encoder.finish().unwrap();
//!
//! let mut decoder = Decoder::new(&packed[..], DecodeOptions::new()).unwrap();
//! let mut text = String::new();
//! decoder.read_to_string(&mut text).unwrap();
//! assert_eq!(text, "streamed bytes");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod bytes;
pub mod container;
pub mod decoder;
pub mod encoder;
pub mod format;
pub mod frame;
pub mod options;
pub mod processor;
pub mod version;

pub use bytes::Bz3Bytes;
pub use container::{BlockInfo, ContainerReader, ContainerWriter, UnitInfo, scan};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use format::Format;
pub use options::{DecodeOptions, EncodeOptions};
pub use processor::BlockProcessor;
pub use version::{MIN_PRIMITIVE_VERSION, VersionPolicy};

pub use oxibz3_block::{BLOCK_SIZE_MAX, BLOCK_SIZE_MIN, DEFAULT_BLOCK_SIZE, bound};
pub use oxibz3_core::{BlockCodec, Bz3Error, Result, Status, Version};

use oxibz3_core::buffer;

/// Decode `source` into a new buffer.
pub fn decode(source: &[u8], options: &DecodeOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    decode_into(source, &mut out, options)?;
    Ok(out)
}

/// Decode `source` into `dest`, replacing its content.
///
/// Returns the decoded length. `source` is never modified; on error `dest`
/// holds whatever was decoded before the failure.
pub fn decode_into(source: &[u8], dest: &mut Vec<u8>, options: &DecodeOptions) -> Result<usize> {
    let max_block_size = options.validate()?;
    dest.clear();
    match options.format {
        Format::File => {
            buffer::reserve_total(dest, decoded_size_hint(source, options, max_block_size));
            let mut reader = ContainerReader::new(source, options)?;
            reader.read_to_end(dest)
        }
        Format::Frame => frame::decode_frame_into(source, dest, options),
    }
}

/// Largest pre-size, as a multiple of the compressed length. Streams that
/// expand further grow `dest` as blocks are decoded.
const PRESIZE_EXPANSION: usize = 8;

/// Output capacity to reserve before decoding `source`.
///
/// Record sizes are untrusted until their blocks decode, so the declared
/// total is capped by the source length and the output limit, and a stream
/// the reader will refuse gets no reservation at all.
fn decoded_size_hint(source: &[u8], options: &DecodeOptions, max_block_size: usize) -> usize {
    let Ok(units) = scan(source) else {
        return 0;
    };
    let take = if options.concat { units.len() } else { 1 };
    let units = &units[..take.min(units.len())];
    if units.iter().any(|unit| unit.block_size > max_block_size) {
        return 0;
    }

    let declared = units
        .iter()
        .fold(0usize, |total, unit| total.saturating_add(unit.original_size()));
    let hint = declared.min(source.len().saturating_mul(PRESIZE_EXPANSION));
    options.max_output_size.map_or(hint, |limit| hint.min(limit))
}

/// Encode `source` into a new buffer.
pub fn encode(source: &[u8], options: &EncodeOptions) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_into(source, &mut out, options)?;
    Ok(out)
}

/// Encode `source` into `dest`, replacing its content.
///
/// Returns the encoded length. An empty `source` still produces a unit
/// header in the file format.
pub fn encode_into(source: &[u8], dest: &mut Vec<u8>, options: &EncodeOptions) -> Result<usize> {
    let block_size = options.validate()?;
    dest.clear();
    match options.format {
        Format::File => {
            let blocks = source.len().div_ceil(block_size);
            buffer::reserve_total(
                dest,
                format::UNIT_HEADER_LEN + blocks * format::RECORD_HEADER_LEN + bound(source.len()),
            );
            let mut writer = ContainerWriter::new(&mut *dest, options)?;
            for chunk in source.chunks(block_size) {
                writer.write_block(chunk)?;
            }
            writer.finish()?;
            Ok(dest.len())
        }
        Format::Frame => frame::encode_frame_into(source, dest, options),
    }
}
