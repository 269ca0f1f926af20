//! Decompress and cat command implementation.

use crate::utils::{confirm_overwrite, copy_mtime, create_progress_bar, decompressed_path};
use oxibz3::{DecodeOptions, Decoder, Format};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Flags of the `decompress` and `cat` subcommands.
#[derive(Debug, Clone)]
pub struct DecompressArgs {
    pub files: Vec<PathBuf>,
    pub output: Option<PathBuf>,
    pub concat: bool,
    pub partial: bool,
    pub frame: bool,
    pub block_size_mib: Option<u32>,
    pub keep: bool,
    pub force: bool,
    pub stdout: bool,
    pub progress: bool,
}

impl DecompressArgs {
    pub fn decode_options(&self) -> DecodeOptions {
        let format = if self.frame { Format::Frame } else { Format::File };
        let options = DecodeOptions::new()
            .with_concat(self.concat)
            .with_partial(self.partial)
            .with_format(format);
        match self.block_size_mib {
            Some(mib) => options.with_block_size((mib as usize) << 20),
            None => options,
        }
    }
}

/// Decompress `input` into `output`; returns the bytes written and the sink.
pub fn decompress_stream<R: Read, W: Write>(
    input: R,
    mut output: W,
    options: &DecodeOptions,
) -> Result<(u64, W), Box<dyn std::error::Error>> {
    let mut decoder = Decoder::new(input, options.clone())?;
    let written = io::copy(&mut decoder, &mut output)?;
    decoder.close();
    output.flush()?;
    Ok((written, output))
}

pub fn cmd_decompress(args: &DecompressArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = args.decode_options();

    if args.files.is_empty() {
        decompress_stream(io::stdin().lock(), io::stdout().lock(), &options)?;
        return Ok(());
    }
    if args.output.is_some() && args.files.len() > 1 {
        return Err("--output takes a single input file".into());
    }

    for input in &args.files {
        decompress_file(input, args, &options)?;
    }
    Ok(())
}

fn decompress_file(
    input: &Path,
    args: &DecompressArgs,
    options: &DecodeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::open(input)?;
    let len = file.metadata()?.len();
    let pb = create_progress_bar(len, args.progress && !args.stdout);
    pb.set_message(input.display().to_string());
    let reader = pb.wrap_read(BufReader::new(file));

    if args.stdout {
        decompress_stream(reader, io::stdout().lock(), options)?;
        return Ok(());
    }

    let target = match &args.output {
        Some(path) => path.clone(),
        None => decompressed_path(input).ok_or_else(|| {
            format!("{}: unknown suffix, use --output or --stdout", input.display())
        })?,
    };
    confirm_overwrite(&target, args.force)?;

    let writer = BufWriter::new(File::create(&target)?);
    let (written, writer) = match decompress_stream(reader, writer, options) {
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
    info!(input = %input.display(), output = %target.display(), written, "decompressed");

    if !args.keep {
        fs::remove_file(input)?;
    }
    Ok(())
}
