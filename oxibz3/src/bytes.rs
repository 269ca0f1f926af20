//! Call-site sugar over the one-shot functions.

use crate::options::{DecodeOptions, EncodeOptions};
use oxibz3_core::Result;

/// Borrowed bytes with default-option encode and decode methods.
///
/// ```
/// use oxibz3::Bz3Bytes;
///
/// let packed = Bz3Bytes::new(b"sugar sugar sugar").encode().unwrap();
/// assert_eq!(Bz3Bytes::new(&packed).decode().unwrap(), b"sugar sugar sugar");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bz3Bytes<'a>(&'a [u8]);

impl<'a> Bz3Bytes<'a> {
    /// Wrap `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self(data)
    }

    /// The wrapped bytes.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    /// Encode as a container stream with default options.
    pub fn encode(&self) -> Result<Vec<u8>> {
        crate::encode(self.0, &EncodeOptions::default())
    }

    /// Decode a container stream with default options.
    pub fn decode(&self) -> Result<Vec<u8>> {
        crate::decode(self.0, &DecodeOptions::default())
    }
}

impl<'a> From<&'a [u8]> for Bz3Bytes<'a> {
    fn from(data: &'a [u8]) -> Self {
        Self(data)
    }
}

impl<'a> From<&'a Vec<u8>> for Bz3Bytes<'a> {
    fn from(data: &'a Vec<u8>) -> Self {
        Self(data)
    }
}
