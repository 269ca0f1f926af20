//! Decode and encode options.
//!
//! Options are plain structs with builder-style setters. They are checked
//! once, when a session or one-shot call starts, so a bad combination fails
//! before any byte is read or written.

use crate::format::{Format, normalize_block_size};
use oxibz3_block::DEFAULT_BLOCK_SIZE;
use oxibz3_core::{Bz3Error, Result};

/// Options for decoding.
///
/// # Example
///
/// ```
/// use oxibz3::{DecodeOptions, Format};
///
/// let opts = DecodeOptions::new().with_concat(false).with_partial(true);
/// assert_eq!(opts.format, Format::File);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Fail with `OutputLimitExceeded` instead of producing more than this.
    /// For frames this is also the output capacity.
    pub max_output_size: Option<usize>,
    /// Decode every unit of a concatenated stream (`true`) or only the first.
    pub concat: bool,
    /// Return what was decoded when the last block is truncated.
    pub partial: bool,
    /// Largest unit block size accepted (file), or the codec block size
    /// (frame). Raised to the minimum if smaller.
    pub block_size: usize,
    /// Expected layout of the source.
    pub format: Format,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_output_size: None,
            concat: true,
            partial: false,
            block_size: DEFAULT_BLOCK_SIZE,
            format: Format::File,
        }
    }
}

impl DecodeOptions {
    /// Default options: file format, concat on, partial off, 16 MiB blocks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output limit.
    pub fn with_max_output_size(mut self, limit: usize) -> Self {
        self.max_output_size = Some(limit);
        self
    }

    /// Set whether concatenated units are decoded.
    pub fn with_concat(mut self, concat: bool) -> Self {
        self.concat = concat;
        self
    }

    /// Set whether a truncated final block is tolerated.
    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Set the block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the expected format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Check values and combinations.
    ///
    /// Returns the block size to build the codec with.
    pub fn validate(&self) -> Result<usize> {
        let block_size = normalize_block_size(self.block_size)?;
        if self.format == Format::Frame && (self.partial || !self.concat) {
            return Err(Bz3Error::invalid_argument(
                "concat and partial only apply to the file format",
            ));
        }
        Ok(block_size)
    }
}

/// Options for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Original bytes per block. Raised to the minimum if smaller.
    pub block_size: usize,
    /// Fail with `OutputLimitExceeded` instead of producing more than this.
    pub max_output_size: Option<usize>,
    /// Layout to produce.
    pub format: Format,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            max_output_size: None,
            format: Format::File,
        }
    }
}

impl EncodeOptions {
    /// Default options: file format, 16 MiB blocks, no output limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the block size.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Set the output limit.
    pub fn with_max_output_size(mut self, limit: usize) -> Self {
        self.max_output_size = Some(limit);
        self
    }

    /// Set the format to produce.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Check values; returns the effective block size.
    pub fn validate(&self) -> Result<usize> {
        normalize_block_size(self.block_size)
    }
}
