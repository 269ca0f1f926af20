//! Multi-block container reader and writer.
//!
//! See [`crate::format`] for the byte layout. The reader walks the stream as
//! a sequence of [`Event`]s (unit headers and block record headers), which
//! lets decoding and [`scan`] share one parser: decoding reads and decodes
//! each record's payload, scanning skips it.

use crate::format::{
    Format, RECORD_HEADER_LEN, RecordHeader, SIGNATURE, UNIT_HEADER_LEN, UnitHeader, has_signature,
};
use crate::options::{DecodeOptions, EncodeOptions};
use crate::processor::BlockProcessor;
use oxibz3_core::{Bz3Error, Result, buffer};
use std::io::{self, Read, Write};
use tracing::{debug, trace};

/// Read until `buf` is full or the source ends; returns the bytes read.
pub(crate) fn read_full<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

/// One structural element of a container stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A unit header at `offset`.
    Unit {
        /// Stream offset of the header.
        offset: u64,
        /// The parsed header.
        header: UnitHeader,
    },
    /// A block record header at `offset`; its payload follows.
    Record {
        /// Stream offset of the record header.
        offset: u64,
        /// The parsed header.
        header: RecordHeader,
    },
}

/// Decoding reader over a container stream.
///
/// Each call to [`next_block`](ContainerReader::next_block) decodes one
/// block and appends it to the caller's buffer.
#[derive(Debug)]
pub struct ContainerReader<R> {
    inner: R,
    processor: Option<BlockProcessor>,
    offset: u64,
    unit: Option<UnitHeader>,
    units: usize,
    concat: bool,
    partial: bool,
    max_block_size: usize,
    limit: Option<usize>,
    produced: usize,
    payload: Vec<u8>,
    finished: bool,
}

impl<R: Read> ContainerReader<R> {
    /// Create a reader. Nothing is read until the first block is requested.
    pub fn new(inner: R, options: &DecodeOptions) -> Result<Self> {
        let max_block_size = options.validate()?;
        if options.format != Format::File {
            return Err(Bz3Error::invalid_argument(
                "container reader requires the file format",
            ));
        }
        Ok(Self {
            inner,
            processor: Some(BlockProcessor::new(max_block_size)?),
            offset: 0,
            unit: None,
            units: 0,
            concat: options.concat,
            partial: options.partial,
            max_block_size,
            limit: options.max_output_size,
            produced: 0,
            payload: Vec::new(),
            finished: false,
        })
    }

    /// Number of units entered so far.
    pub fn units(&self) -> usize {
        self.units
    }

    /// Decoded bytes produced so far.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Bytes consumed from the source so far.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Whether the end of the stream has been reached.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drop the codec state and payload buffer. Later decode calls fail
    /// with `ClosedSession`; the source stays available.
    pub fn release(&mut self) {
        if self.processor.take().is_some() {
            debug!(units = self.units, produced = self.produced, "released block processor");
        }
        self.payload = Vec::new();
        self.finished = true;
    }

    /// Whether [`release`](ContainerReader::release) has been called.
    pub fn is_released(&self) -> bool {
        self.processor.is_none()
    }

    /// Get a reference to the underlying reader.
    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Consume the reader and return the underlying source.
    pub fn into_inner(self) -> R {
        self.inner
    }

    fn finish_early(&mut self) -> Result<Option<Event>> {
        self.finished = true;
        Ok(None)
    }

    fn enter_unit(&mut self, bytes: &[u8; UNIT_HEADER_LEN], offset: u64) -> Result<Event> {
        let header = UnitHeader::parse(bytes, offset)?;
        if header.block_size > self.max_block_size {
            return Err(Bz3Error::BlockSizeExceeded {
                declared: header.block_size,
                limit: self.max_block_size,
            });
        }
        self.unit = Some(header);
        self.units += 1;
        debug!(offset, block_size = header.block_size, unit = self.units, "entering unit");
        Ok(Event::Unit { offset, header })
    }

    fn first_unit(&mut self) -> Result<Event> {
        let mut head = [0u8; UNIT_HEADER_LEN];
        let got = read_full(&mut self.inner, &mut head)?;
        self.offset += got as u64;

        let seen = got.min(SIGNATURE.len());
        if got == 0 {
            return Err(Bz3Error::truncated(0, UNIT_HEADER_LEN, 0));
        }
        if head[..seen] != SIGNATURE[..seen] {
            return Err(Bz3Error::format_mismatch(
                Format::File.name(),
                "source does not start with the BZ3v1 signature",
            ));
        }
        if got < UNIT_HEADER_LEN {
            return Err(Bz3Error::truncated(0, UNIT_HEADER_LEN, got));
        }
        self.enter_unit(&head, 0)
    }

    /// Advance to the next unit header or record header.
    ///
    /// After a [`Event::Record`] the caller must consume exactly
    /// `compressed_size` payload bytes before calling this again.
    pub fn next_event(&mut self) -> Result<Option<Event>> {
        if self.finished {
            return Ok(None);
        }
        if self.unit.is_none() {
            return self.first_unit().map(Some);
        }

        let at = self.offset;
        let mut head = [0u8; UNIT_HEADER_LEN];
        let got = read_full(&mut self.inner, &mut head[..RECORD_HEADER_LEN])?;
        self.offset += got as u64;

        if got == 0 {
            debug!(offset = at, units = self.units, "end of stream");
            return self.finish_early();
        }

        if has_signature(&head[..got]) {
            if !self.concat {
                debug!(offset = at, "next unit found, concat disabled; stopping");
                return self.finish_early();
            }
            let more = read_full(&mut self.inner, &mut head[got..])?;
            self.offset += more as u64;
            if got + more < UNIT_HEADER_LEN {
                if self.partial {
                    return self.finish_early();
                }
                return Err(Bz3Error::truncated(at, UNIT_HEADER_LEN, got + more));
            }
            return self.enter_unit(&head, at).map(Some);
        }

        if got < RECORD_HEADER_LEN {
            if self.partial {
                debug!(offset = at, trailing = got, "ignoring incomplete trailing record header");
                return self.finish_early();
            }
            return Err(Bz3Error::malformed(
                at,
                format!("{} trailing bytes after the last block", got),
            ));
        }

        let block_size = self.unit.map_or(self.max_block_size, |u| u.block_size);
        let mut record = [0u8; RECORD_HEADER_LEN];
        record.copy_from_slice(&head[..RECORD_HEADER_LEN]);
        let header = RecordHeader::parse(&record, at, block_size)?;
        Ok(Some(Event::Record { offset: at, header }))
    }

    /// Decode the next block and append it to `dest`.
    ///
    /// Returns the number of bytes appended (zero for an empty block), or
    /// `None` at the end of the stream.
    pub fn next_block(&mut self, dest: &mut Vec<u8>) -> Result<Option<usize>> {
        if self.processor.is_none() {
            return Err(Bz3Error::ClosedSession);
        }
        loop {
            let (at, record) = match self.next_event()? {
                None => return Ok(None),
                Some(Event::Unit { .. }) => continue,
                Some(Event::Record { offset, header }) => (offset, header),
            };

            if let Some(limit) = self.limit {
                if self.produced + record.original_size > limit {
                    return Err(Bz3Error::OutputLimitExceeded { limit });
                }
            }

            self.payload.clear();
            buffer::grow(&mut self.payload, record.compressed_size);
            let got = read_full(&mut self.inner, &mut self.payload)?;
            self.offset += got as u64;
            if got < record.compressed_size {
                if self.partial {
                    debug!(offset = at, needed = record.compressed_size, got, "truncated final block ignored");
                    self.finished = true;
                    return Ok(None);
                }
                return Err(Bz3Error::truncated(
                    at + RECORD_HEADER_LEN as u64,
                    record.compressed_size,
                    got,
                ));
            }

            let processor = self.processor.as_mut().ok_or(Bz3Error::ClosedSession)?;
            let written = processor.decode_block(&self.payload, dest, record.original_size)?;
            if written != record.original_size {
                let start = dest.len() - written;
                buffer::truncate(dest, start);
                return Err(Bz3Error::malformed(
                    at,
                    format!(
                        "block decoded to {} bytes, header says {}",
                        written, record.original_size
                    ),
                ));
            }
            self.produced += written;
            trace!(
                offset = at,
                compressed = record.compressed_size,
                original = written,
                "decoded block"
            );
            return Ok(Some(written));
        }
    }

    /// Decode every remaining block into `dest`; returns the bytes appended.
    pub fn read_to_end(&mut self, dest: &mut Vec<u8>) -> Result<usize> {
        let start = dest.len();
        while self.next_block(dest)?.is_some() {}
        Ok(dest.len() - start)
    }
}

/// Encoding writer producing a single-unit container stream.
#[derive(Debug)]
pub struct ContainerWriter<W: Write> {
    inner: W,
    processor: BlockProcessor,
    block_size: usize,
    header_written: bool,
    written: usize,
    limit: Option<usize>,
    scratch: Vec<u8>,
    blocks: usize,
}

impl<W: Write> ContainerWriter<W> {
    /// Create a writer. The unit header is written with the first block.
    pub fn new(inner: W, options: &EncodeOptions) -> Result<Self> {
        let block_size = options.validate()?;
        Ok(Self {
            inner,
            processor: BlockProcessor::new(block_size)?,
            block_size,
            header_written: false,
            written: 0,
            limit: options.max_output_size,
            scratch: Vec::new(),
            blocks: 0,
        })
    }

    /// Original bytes per block.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Bytes written to the sink so far.
    pub fn bytes_written(&self) -> usize {
        self.written
    }

    /// Blocks written so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    fn reserve_output(&mut self, len: usize) -> Result<()> {
        match self.limit {
            Some(limit) if self.written + len > limit => {
                Err(Bz3Error::OutputLimitExceeded { limit })
            }
            _ => Ok(()),
        }
    }

    fn write_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.reserve_output(UNIT_HEADER_LEN)?;
        let header = UnitHeader {
            block_size: self.block_size,
        };
        self.inner.write_all(&header.to_bytes())?;
        self.written += UNIT_HEADER_LEN;
        self.header_written = true;
        debug!(block_size = self.block_size, "wrote unit header");
        Ok(())
    }

    /// Encode `data` (at most one block) and write it as a block record.
    ///
    /// Returns the number of bytes written to the sink.
    pub fn write_block(&mut self, data: &[u8]) -> Result<usize> {
        let before = self.written;
        self.write_header()?;

        self.scratch.clear();
        let packed = self.processor.encode_block(data, &mut self.scratch)?;
        self.reserve_output(RECORD_HEADER_LEN + packed)?;

        let record = RecordHeader {
            compressed_size: packed,
            original_size: data.len(),
        };
        self.inner.write_all(&record.to_bytes())?;
        self.inner.write_all(&self.scratch)?;
        self.written += RECORD_HEADER_LEN + packed;
        self.blocks += 1;
        trace!(original = data.len(), compressed = packed, "wrote block");

        Ok(self.written - before)
    }

    /// Make sure the unit header is present and flush the sink.
    pub fn finish(&mut self) -> Result<()> {
        self.write_header()?;
        self.inner.flush()?;
        Ok(())
    }

    /// Get a reference to the underlying writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Get a mutable reference to the underlying writer.
    pub fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Consume the writer and return the sink, without finishing.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

/// Layout of one block record, as found by [`scan`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockInfo {
    /// Stream offset of the record header.
    pub offset: u64,
    /// Payload length.
    pub compressed_size: usize,
    /// Decoded length.
    pub original_size: usize,
}

/// Layout of one unit, as found by [`scan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitInfo {
    /// Stream offset of the unit header.
    pub offset: u64,
    /// Block size declared by the unit.
    pub block_size: usize,
    /// Block records, in stream order.
    pub blocks: Vec<BlockInfo>,
}

impl UnitInfo {
    /// Total decoded size of the unit.
    pub fn original_size(&self) -> usize {
        self.blocks
            .iter()
            .fold(0usize, |total, b| total.saturating_add(b.original_size))
    }

    /// Total encoded size of the unit, headers included.
    pub fn stored_size(&self) -> usize {
        UNIT_HEADER_LEN
            + self
                .blocks
                .iter()
                .map(|b| RECORD_HEADER_LEN + b.compressed_size)
                .sum::<usize>()
    }
}

/// Walk a container stream without decoding payloads.
///
/// Every unit is listed regardless of `concat`; payloads are skipped but
/// must be present in full.
pub fn scan<R: Read>(source: R) -> Result<Vec<UnitInfo>> {
    let options = DecodeOptions::new().with_block_size(oxibz3_block::BLOCK_SIZE_MAX);
    let mut reader = ContainerReader::new(source, &options)?;
    let mut units: Vec<UnitInfo> = Vec::new();

    while let Some(event) = reader.next_event()? {
        match event {
            Event::Unit { offset, header } => units.push(UnitInfo {
                offset,
                block_size: header.block_size,
                blocks: Vec::new(),
            }),
            Event::Record { offset, header } => {
                let want = header.compressed_size as u64;
                let skipped = io::copy(&mut (&mut reader.inner).take(want), &mut io::sink())?;
                reader.offset += skipped;
                if skipped < want {
                    return Err(Bz3Error::truncated(
                        offset + RECORD_HEADER_LEN as u64,
                        header.compressed_size,
                        skipped as usize,
                    ));
                }
                if let Some(unit) = units.last_mut() {
                    unit.blocks.push(BlockInfo {
                        offset,
                        compressed_size: header.compressed_size,
                        original_size: header.original_size,
                    });
                }
            }
        }
    }

    Ok(units)
}
