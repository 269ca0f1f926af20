//! Compress command implementation.

use crate::utils::{compressed_path, confirm_overwrite, copy_mtime, create_progress_bar};
use oxibz3::{EncodeOptions, Encoder, Format, encode};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Flags of the `compress` subcommand.
#[derive(Debug, Clone)]
pub struct CompressArgs {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub block_size_mib: u32,
    pub frame: bool,
    pub keep: bool,
    pub force: bool,
    pub stdout: bool,
    pub progress: bool,
}

impl CompressArgs {
    pub fn encode_options(&self) -> EncodeOptions {
        let format = if self.frame { Format::Frame } else { Format::File };
        EncodeOptions::new()
            .with_block_size((self.block_size_mib as usize) << 20)
            .with_format(format)
    }
}

/// Compress `input` into `output`; returns the bytes read and the sink.
pub fn compress_stream<R: Read, W: Write>(
    mut input: R,
    mut output: W,
    options: &EncodeOptions,
) -> Result<(u64, W), Box<dyn std::error::Error>> {
    if options.format == Format::Frame {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        output.write_all(&encode(&data, options)?)?;
        output.flush()?;
        return Ok((data.len() as u64, output));
    }

    let mut encoder = Encoder::new(output, options.clone())?;
    let read = io::copy(&mut input, &mut encoder)?;
    Ok((read, encoder.finish()?))
}

pub fn cmd_compress(args: &CompressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.encode_options();

    if args.files.is_empty() {
        compress_stream(io::stdin().lock(), io::stdout().lock(), &options)?;
        return Ok(());
    }
    if args.output.is_some() && args.files.len() > 1 {
        return Err("--output takes a single input file".into());
    }

    for input in &args.files {
        compress_file(input, args, &options)?;
    }
    Ok(())
}

fn compress_file(
    input: &Path,
    args: &CompressArgs,
    options: &EncodeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input)?;
    let len = file.metadata()?.len();
    let pb = create_progress_bar(len, args.progress && !args.stdout);
    pb.set_message(input.display().to_string());
    let reader = pb.wrap_read(BufReader::new(file));

    if args.stdout {
        compress_stream(reader, io::stdout().lock(), options)?;
        return Ok(());
    }

    let target = args.output.clone().unwrap_or_else(|| compressed_path(input));
    confirm_overwrite(&target, args.force)?;

    let writer = BufWriter::new(File::create(&target)?);
    let (read, writer) = match compress_stream(reader, writer, options) {
        Ok(done) => done,
        Err(e) => {
            pb.abandon();
            let _ = fs::remove_file(&target);
            return Err(e);
        }
    };
    writer.into_inner().map_err(|e| e.into_error())?.sync_all()?;
    pb.finish_and_clear();

    copy_mtime(input, &target)?;
    let written = fs::metadata(&target)?.len();
    info!(input = %input.display(), output = %target.display(), read, written, "compressed");

    if !args.keep {
        fs::remove_file(input)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxibz3::{DecodeOptions, decode};

    fn args() -> CompressArgs {
        CompressArgs {
            files: Vec::new(),
            output: None,
            block_size_mib: 1,
            frame: false,
            keep: true,
            force: false,
            stdout: false,
            progress: false,
        }
    }

    #[test]
    fn test_options_from_flags() {
        let opts = args().encode_options();
        assert_eq!(opts.block_size, 1 << 20);
        assert_eq!(opts.format, Format::File);

        let frame = CompressArgs { frame: true, ..args() };
        assert_eq!(frame.encode_options().format, Format::Frame);
    }

    #[test]
    fn test_compress_stream() {
        let data = b"compress me, compress me, compress me".repeat(50);
        let (read, packed) = compress_stream(&data[..], Vec::new(), &args().encode_options()).unwrap();
        assert_eq!(read, data.len() as u64);
        assert_eq!(decode(&packed, &DecodeOptions::new()).unwrap(), data);
    }
}
