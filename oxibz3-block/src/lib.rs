//! # OxiBz3 Block
//!
//! Pure Rust single-block codec used by the OxiBz3 container layer.
//!
//! One block (at most the configured block size) is transformed by
//!
//! 1. **BWT**: Burrows-Wheeler Transform over cyclic rotations
//! 2. **MTF**: Move-to-Front transform
//! 3. **Range coding**: adaptive binary range coder with a small context model
//!
//! and framed with a CRC-32C so corruption is reported as
//! [`Status::CrcMismatch`](oxibz3_core::Status::CrcMismatch) instead of
//! producing wrong output.
//!
//! ## Example
//!
//! ```rust
//! use oxibz3_block::{Bz3BlockCodec, bound};
//! use oxibz3_core::BlockCodec;
//!
//! let mut codec = Bz3BlockCodec::default();
//! let data = b"Hello, World! Hello, World! Hello, World!";
//!
//! let mut block = vec![0u8; bound(data.len())];
//! let n = codec.encode_block(data, &mut block).unwrap();
//! block.truncate(n);
//!
//! let mut out = vec![0u8; data.len()];
//! let m = codec.decode_block(&block, &mut out).unwrap();
//! assert_eq!(&out[..m], data);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod block;
pub mod bwt;
mod model;
pub mod mtf;
pub mod range_coder;

pub use block::{
    BLOCK_SIZE_MAX, BLOCK_SIZE_MIN, Bz3BlockCodec, CODEC_VERSION, DEFAULT_BLOCK_SIZE, HEADER_LEN,
    bound,
};
