//! Streaming encoder session.
//!
//! Input is buffered until a full block is available; each full block is
//! encoded and written immediately. [`Encoder::flush`] forces the partial
//! block out, [`Encoder::close`] flushes and makes sure the stream is
//! complete (a unit header is written even when no data was).

use crate::container::ContainerWriter;
use crate::format::Format;
use crate::frame;
use crate::options::EncodeOptions;
use oxibz3_core::{Bz3Error, Result, Status};
use std::io::{self, Write};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Open,
    Failed,
    Closed,
}

#[derive(Debug)]
enum Sink<W: Write> {
    File(ContainerWriter<W>),
    Frame(W),
}

/// Streaming encoder writing a container stream or a frame.
///
/// # Example
///
/// ```
/// use oxibz3::{Encoder, EncodeOptions, decode, DecodeOptions};
///
/// let mut encoder = Encoder::new(Vec::new(), EncodeOptions::new()).unwrap();
/// encoder.write(b"hello ").unwrap();
/// encoder.write(b"world").unwrap();
/// let packed = encoder.finish().unwrap();
///
/// assert_eq!(decode(&packed, &DecodeOptions::new()).unwrap(), b"hello world");
/// ```
#[derive(Debug)]
pub struct Encoder<W: Write> {
    sink: Option<Sink<W>>,
    options: EncodeOptions,
    block_size: usize,
    pending: Vec<u8>,
    state: SessionState,
    consumed: u64,
}

impl<W: Write> Encoder<W> {
    /// Open a session writing to `inner`.
    pub fn new(inner: W, options: EncodeOptions) -> Result<Self> {
        let block_size = options.validate()?;
        let sink = match options.format {
            Format::File => Sink::File(ContainerWriter::new(inner, &options)?),
            Format::Frame => Sink::Frame(inner),
        };
        debug!(format = %options.format, block_size, "encoder opened");
        Ok(Self {
            sink: Some(sink),
            options,
            block_size,
            pending: Vec::new(),
            state: SessionState::Open,
            consumed: 0,
        })
    }

    /// Open a session, run `f` on it, and close it on every exit path.
    ///
    /// Returns `f`'s result, or the close error if `f` succeeded but closing
    /// did not.
    pub fn open_with<T, F>(inner: W, options: EncodeOptions, f: F) -> Result<T>
    where
        F: FnOnce(&mut Encoder<W>) -> Result<T>,
    {
        let mut encoder = Self::new(inner, options)?;
        let result = f(&mut encoder);
        let closed = encoder.close();
        let value = result?;
        closed?;
        Ok(value)
    }

    /// Original bytes per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Bytes accepted by [`write`](Encoder::write) so far.
    pub fn total_in(&self) -> u64 {
        self.consumed
    }

    /// Whether [`close`](Encoder::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.state == SessionState::Closed
    }

    fn ensure_open(&self) -> Result<()> {
        match self.state {
            SessionState::Open => Ok(()),
            SessionState::Failed => Err(Bz3Error::SessionFailed),
            SessionState::Closed => Err(Bz3Error::ClosedSession),
        }
    }

    fn track<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.state = SessionState::Failed;
        }
        result
    }

    fn write_blocks(&mut self, mut data: &[u8]) -> Result<()> {
        let block_size = self.block_size;
        let Some(Sink::File(writer)) = self.sink.as_mut() else {
            if self.pending.len() + data.len() > block_size {
                return Err(Status::DataTooBig.into());
            }
            self.pending.extend_from_slice(data);
            return Ok(());
        };

        if !self.pending.is_empty() {
            let take = (block_size - self.pending.len()).min(data.len());
            self.pending.extend_from_slice(&data[..take]);
            data = &data[take..];
            if self.pending.len() < block_size {
                return Ok(());
            }
            writer.write_block(&self.pending)?;
            self.pending.clear();
        }

        while data.len() >= block_size {
            writer.write_block(&data[..block_size])?;
            data = &data[block_size..];
        }
        self.pending.extend_from_slice(data);
        Ok(())
    }

    /// Accept `data`, writing every block it completes.
    ///
    /// Returns `data.len()`. For frames, input beyond one block fails with
    /// `DataTooBig`.
    pub fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.ensure_open()?;
        let result = self.write_blocks(data);
        self.track(result)?;
        self.consumed += data.len() as u64;
        Ok(data.len())
    }

    fn flush_pending(&mut self) -> Result<()> {
        match self.sink.as_mut() {
            Some(Sink::File(writer)) => {
                if !self.pending.is_empty() {
                    writer.write_block(&self.pending)?;
                    self.pending.clear();
                }
                writer.get_mut().flush()?;
            }
            Some(Sink::Frame(inner)) => inner.flush()?,
            None => return Err(Bz3Error::ClosedSession),
        }
        Ok(())
    }

    /// Encode the buffered partial block (container streams) and flush the
    /// sink.
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_open()?;
        let result = self.flush_pending();
        self.track(result)
    }

    fn finish_stream(&mut self) -> Result<()> {
        match self.sink.as_mut() {
            Some(Sink::File(writer)) => {
                if !self.pending.is_empty() {
                    writer.write_block(&self.pending)?;
                }
                writer.finish()?;
            }
            Some(Sink::Frame(inner)) => {
                let mut frame = Vec::new();
                frame::encode_frame_into(&self.pending, &mut frame, &self.options)?;
                inner.write_all(&frame)?;
                inner.flush()?;
            }
            None => {}
        }
        Ok(())
    }

    /// Flush, complete the stream and release the buffer. Calling it again
    /// does nothing.
    pub fn close(&mut self) -> Result<()> {
        let result = match self.state {
            SessionState::Closed => return Ok(()),
            SessionState::Failed => Ok(()),
            SessionState::Open => self.finish_stream(),
        };
        self.pending = Vec::new();
        self.state = SessionState::Closed;
        debug!(total_in = self.consumed, ok = result.is_ok(), "encoder closed");
        result
    }

    /// Close the session and return the sink.
    pub fn finish(mut self) -> Result<W> {
        self.close()?;
        match self.sink.take() {
            Some(Sink::File(writer)) => Ok(writer.into_inner()),
            Some(Sink::Frame(inner)) => Ok(inner),
            None => Err(Bz3Error::ClosedSession),
        }
    }
}

impl<W: Write> Write for Encoder<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Encoder::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        Encoder::flush(self).map_err(io::Error::from)
    }
}

impl<W: Write> Drop for Encoder<W> {
    fn drop(&mut self) {
        if self.state == SessionState::Open {
            let _ = self.close();
        }
    }
}
