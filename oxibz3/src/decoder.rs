//! Streaming decoder session.
//!
//! A [`Decoder`] pulls compressed bytes from any [`Read`] source and hands
//! out decoded bytes in caller-chosen amounts. Blocks are decoded only when
//! the bytes already buffered cannot satisfy a request.
//!
//! ```text
//!   Open ──source ends──▶ Exhausted ──buffer drained──▶ (end of stream)
//!    │                       │
//!    └──error──▶ Failed      └──close──▶ Closed
//! ```

use crate::container::ContainerReader;
use crate::format::Format;
use crate::frame;
use crate::options::DecodeOptions;
use oxibz3_core::{Bz3Error, Result};
use std::io::{self, Read};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Open,
    Exhausted,
    Failed,
    Closed,
}

#[derive(Debug)]
enum Source<R> {
    File(ContainerReader<R>),
    Frame(R),
}

/// Streaming decoder over a container stream or a frame.
///
/// # Example
///
/// ```
/// use oxibz3::{Decoder, DecodeOptions, EncodeOptions, encode};
///
/// let packed = encode(b"123456789ABCDEF", &EncodeOptions::new()).unwrap();
/// let mut decoder = Decoder::new(&packed[..], DecodeOptions::new()).unwrap();
///
/// assert_eq!(decoder.read_bytes(5).unwrap().unwrap(), b"12345");
/// assert_eq!(decoder.read_all().unwrap().unwrap(), b"6789ABCDEF");
/// assert_eq!(decoder.read_all().unwrap(), None);
/// decoder.close();
/// ```
#[derive(Debug)]
pub struct Decoder<R: Read> {
    source: Source<R>,
    options: DecodeOptions,
    state: SessionState,
    pending: Vec<u8>,
    pos: usize,
}

impl<R: Read> Decoder<R> {
    /// Open a session over `inner`.
    pub fn new(inner: R, options: DecodeOptions) -> Result<Self> {
        options.validate()?;
        let source = match options.format {
            Format::File => Source::File(ContainerReader::new(inner, &options)?),
            Format::Frame => Source::Frame(inner),
        };
        debug!(format = %options.format, concat = options.concat, "decoder opened");
        Ok(Self {
            source,
            options,
            state: SessionState::Open,
            pending: Vec::new(),
            pos: 0,
        })
    }

    /// Open a session, run `f` on it, and close it on every exit path.
    pub fn open_with<T, F>(inner: R, options: DecodeOptions, f: F) -> Result<T>
    where
        F: FnOnce(&mut Decoder<R>) -> Result<T>,
    {
        let mut decoder = Self::new(inner, options)?;
        let result = f(&mut decoder);
        decoder.close();
        result
    }

    /// Format this session decodes.
    pub fn format(&self) -> Format {
        self.options.format
    }

    /// Whether [`close`](Decoder::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    /// Whether the source is exhausted and every decoded byte was handed out.
    pub fn is_eof(&self) -> bool {
        self.state == SessionState::Exhausted && self.available() == 0
    }

    fn available(&self) -> usize {
        self.pending.len() - self.pos
    }

    fn ensure_usable(&self) -> Result<()> {
        match self.state {
            SessionState::Closed => Err(Bz3Error::ClosedSession),
            SessionState::Failed => Err(Bz3Error::SessionFailed),
            SessionState::Open | SessionState::Exhausted => Ok(()),
        }
    }

    /// Decode one more step into `pending`; false once the source is done.
    fn decode_more(&mut self) -> Result<bool> {
        if self.pos > 0 {
            self.pending.drain(..self.pos);
            self.pos = 0;
        }
        match &mut self.source {
            Source::File(reader) => Ok(reader.next_block(&mut self.pending)?.is_some()),
            Source::Frame(inner) => {
                let mut raw = Vec::new();
                inner.read_to_end(&mut raw)?;
                frame::decode_frame_into(&raw, &mut self.pending, &self.options)?;
                Ok(false)
            }
        }
    }

    /// Buffer decoded bytes until `want` are available or the source ends.
    /// `None` means everything.
    fn fill(&mut self, want: Option<usize>) -> Result<()> {
        while self.state == SessionState::Open && want.is_none_or(|n| self.available() < n) {
            match self.decode_more() {
                Ok(true) => {}
                Ok(false) => {
                    self.state = SessionState::Exhausted;
                    debug!(buffered = self.available(), "decoder source exhausted");
                }
                Err(e) => {
                    self.state = SessionState::Failed;
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Read up to `size` bytes (all remaining bytes for `None`) into `dest`,
    /// replacing its content.
    ///
    /// Returns `Some(0)` for a zero-size request without touching the
    /// stream, `Some(n)` when bytes were produced, and `None` at the end of
    /// the stream.
    pub fn read_into(&mut self, size: Option<usize>, dest: &mut Vec<u8>) -> Result<Option<usize>> {
        self.ensure_usable()?;
        dest.clear();
        if size == Some(0) {
            return Ok(Some(0));
        }

        self.fill(size)?;
        let take = size.map_or(self.available(), |n| n.min(self.available()));
        if take == 0 {
            return Ok(None);
        }
        dest.extend_from_slice(&self.pending[self.pos..self.pos + take]);
        self.pos += take;
        Ok(Some(take))
    }

    /// Read exactly `size` bytes, or fewer at the end of the stream.
    ///
    /// `Some(empty)` for `size == 0`; `None` once nothing is left.
    pub fn read_bytes(&mut self, size: usize) -> Result<Option<Vec<u8>>> {
        let mut out = Vec::new();
        Ok(self.read_into(Some(size), &mut out)?.map(|_| out))
    }

    /// Read everything that remains; `None` once nothing is left.
    pub fn read_all(&mut self) -> Result<Option<Vec<u8>>> {
        let mut out = Vec::new();
        Ok(self.read_into(None, &mut out)?.map(|_| out))
    }

    /// Release the decoding state. Calling it again does nothing.
    pub fn close(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        if let Source::File(reader) = &mut self.source {
            reader.release();
        }
        self.pending = Vec::new();
        self.pos = 0;
        self.state = SessionState::Closed;
        debug!("decoder closed");
    }

    /// Consume the session and return the source.
    pub fn into_inner(self) -> R {
        match self.source {
            Source::File(reader) => reader.into_inner(),
            Source::Frame(inner) => inner,
        }
    }
}

impl<R: Read> Read for Decoder<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.ensure_usable()?;
        self.fill(Some(1))?;
        let n = buf.len().min(self.available());
        buf[..n].copy_from_slice(&self.pending[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}
