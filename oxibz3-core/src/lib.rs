//! # OxiBz3 Core
//!
//! Core components shared by the OxiBz3 crates.
//!
//! - [`error`]: the error taxonomy for container, frame and session failures
//! - [`traits`]: the [`BlockCodec`] seam and the primitive [`Status`] codes
//! - [`buffer`]: growing and truncating output buffers around primitive calls
//! - [`crc`]: CRC-32C checksums for block integrity
//! - [`version`]: semantic versions reported by block codecs
//!
//! ## Architecture
//!
//! OxiBz3 is designed as a layered stack:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L4: CLI                                                 │
//! │     oxibz3 compress / decompress / cat / test / info   │
//! ├─────────────────────────────────────────────────────────┤
//! │ L3: Container                                           │
//! │     BZ3v1 units, raw frames, streaming sessions        │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Block codec                                         │
//! │     BWT + MTF + adaptive range coder                    │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Core (this crate)                                   │
//! │     BlockCodec trait, Status, buffers, CRC-32C          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxibz3_core::buffer;
//! use oxibz3_core::crc::Crc32c;
//!
//! let mut out = b"head".to_vec();
//! buffer::grow(&mut out, 16);
//! assert_eq!(&out[..4], b"head");
//! buffer::truncate(&mut out, 6);
//! assert_eq!(out.len(), 6);
//!
//! assert_eq!(Crc32c::compute(b"123456789"), 0xE306_9283);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod buffer;
pub mod crc;
pub mod error;
pub mod traits;
pub mod version;

// Re-exports for convenience
pub use crc::Crc32c;
pub use error::{Bz3Error, Result};
pub use traits::{BlockCodec, Status};
pub use version::Version;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::buffer;
    pub use crate::error::{Bz3Error, Result};
    pub use crate::traits::{BlockCodec, Status};
    pub use crate::version::Version;
}
