//! OxiBz3 CLI - bzip3-style compression in Pure Rust
//!
//! Compresses to and from the `BZ3v1` container format (or raw single-block
//! frames), with concatenated-stream and truncated-stream handling.

mod commands;
mod utils;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{CompressArgs, DecompressArgs, cmd_compress, cmd_decompress, cmd_info, cmd_test};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "oxibz3")]
#[command(author, version, about = "Pure Rust bzip3-style compressor")]
#[command(long_about = "
OxiBz3 compresses files with a Burrows-Wheeler block codec and stores them
in the BZ3v1 container format. Concatenated .bz3 files decode as one stream.

Examples:
  oxibz3 compress notes.txt
  oxibz3 compress -b 64 -k big.log
  oxibz3 decompress notes.txt.bz3
  oxibz3 cat part1.bz3 part2.bz3 > whole.txt
  oxibz3 decompress --partial --stdout damaged.bz3
  oxibz3 test *.bz3
  oxibz3 info --json notes.txt.bz3
  oxibz3 completions bash > oxibz3.bash
")]
struct Cli {
    /// Log more (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress files (stdin to stdout when no file is given)
    #[command(alias = "c", alias = "z")]
    Compress {
        /// Files to compress
        files: Vec<PathBuf>,

        /// Output file (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Block size in MiB
        #[arg(short, long, default_value_t = 16, value_parser = clap::value_parser!(u32).range(1..=511))]
        block_size: u32,

        /// Write a raw single-block frame instead of a container
        #[arg(long)]
        frame: bool,

        /// Keep input files
        #[arg(short, long)]
        keep: bool,

        /// Overwrite existing output files
        #[arg(short, long)]
        force: bool,

        /// Write to standard output
        #[arg(short = 'c', long)]
        stdout: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Decompress files (stdin to stdout when no file is given)
    #[command(alias = "d", alias = "x")]
    Decompress {
        /// Files to decompress
        files: Vec<PathBuf>,

        /// Output file (single input only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop after the first unit of a concatenated file
        #[arg(long)]
        no_concat: bool,

        /// Keep what was decoded when the last block is truncated
        #[arg(long)]
        partial: bool,

        /// Input is a raw single-block frame
        #[arg(long)]
        frame: bool,

        /// Largest accepted block size in MiB (frame: the block size)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=511))]
        block_size: Option<u32>,

        /// Keep input files
        #[arg(short, long)]
        keep: bool,

        /// Overwrite existing output files
        #[arg(short, long)]
        force: bool,

        /// Write to standard output
        #[arg(short = 'c', long)]
        stdout: bool,

        /// Hide the progress bar
        #[arg(long)]
        no_progress: bool,
    },

    /// Decompress files to standard output
    Cat {
        /// Files to decompress
        files: Vec<PathBuf>,

        /// Stop after the first unit of each file
        #[arg(long)]
        no_concat: bool,

        /// Keep what was decoded when the last block is truncated
        #[arg(long)]
        partial: bool,
    },

    /// Test file integrity
    #[command(alias = "t")]
    Test {
        /// Files to test
        files: Vec<PathBuf>,

        /// Stop after the first unit of each file
        #[arg(long)]
        no_concat: bool,
    },

    /// Show the unit and block layout of a file
    #[command(alias = "i")]
    Info {
        /// File to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let verbose = cli.verbose > 0;

    let result = match cli.command {
        Commands::Compress {
            files,
            output,
            block_size,
            frame,
            keep,
            force,
            stdout,
            no_progress,
        } => cmd_compress(&CompressArgs {
            files,
            output,
            block_size_mib: block_size,
            frame,
            keep,
            force,
            stdout,
            progress: !no_progress,
        }),
        Commands::Decompress {
            files,
            output,
            no_concat,
            partial,
            frame,
            block_size,
            keep,
            force,
            stdout,
            no_progress,
        } => cmd_decompress(&DecompressArgs {
            files,
            output,
            concat: !no_concat,
            partial,
            frame,
            block_size_mib: block_size,
            keep,
            force,
            stdout,
            progress: !no_progress,
        }),
        Commands::Cat {
            files,
            no_concat,
            partial,
        } => cmd_decompress(&DecompressArgs {
            files,
            output: None,
            concat: !no_concat,
            partial,
            frame: false,
            block_size_mib: None,
            keep: true,
            force: false,
            stdout: true,
            progress: false,
        }),
        Commands::Test { files, no_concat } => {
            let options = oxibz3::DecodeOptions::new().with_concat(!no_concat);
            cmd_test(&files, &options, verbose)
        }
        Commands::Info { file, json } => cmd_info(&file, json, verbose),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "oxibz3", &mut io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_compress() {
        let cli = Cli::try_parse_from(["oxibz3", "-vv", "c", "-b", "32", "-k", "a.txt"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Compress {
                files,
                block_size,
                keep,
                frame,
                ..
            } => {
                assert_eq!(files, vec![PathBuf::from("a.txt")]);
                assert_eq!(block_size, 32);
                assert!(keep);
                assert!(!frame);
            }
            _ => panic!("expected compress"),
        }
    }

    #[test]
    fn test_block_size_range() {
        assert!(Cli::try_parse_from(["oxibz3", "compress", "-b", "0", "a"]).is_err());
        assert!(Cli::try_parse_from(["oxibz3", "compress", "-b", "512", "a"]).is_err());
        assert!(Cli::try_parse_from(["oxibz3", "compress", "-b", "511", "a"]).is_ok());
    }

    #[test]
    fn test_parse_decompress_flags() {
        let cli = Cli::try_parse_from([
            "oxibz3",
            "decompress",
            "--no-concat",
            "--partial",
            "-c",
            "a.bz3",
        ])
        .unwrap();
        match cli.command {
            Commands::Decompress {
                no_concat,
                partial,
                stdout,
                block_size,
                ..
            } => {
                assert!(no_concat);
                assert!(partial);
                assert!(stdout);
                assert_eq!(block_size, None);
            }
            _ => panic!("expected decompress"),
        }
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = std::env::temp_dir().join(format!("oxibz3-cli-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("sample.txt");
        let data = b"a file on disk, a file on disk\n".repeat(100);
        std::fs::write(&input, &data).unwrap();

        cmd_compress(&CompressArgs {
            files: vec![input.clone()],
            output: None,
            block_size_mib: 1,
            frame: false,
            keep: false,
            force: true,
            stdout: false,
            progress: false,
        })
        .unwrap();
        let packed = dir.join("sample.txt.bz3");
        assert!(packed.exists());
        assert!(!input.exists());

        cmd_decompress(&DecompressArgs {
            files: vec![packed.clone()],
            output: None,
            concat: true,
            partial: false,
            frame: false,
            block_size_mib: None,
            keep: true,
            force: true,
            stdout: false,
            progress: false,
        })
        .unwrap();
        assert_eq!(std::fs::read(&input).unwrap(), data);
        assert!(packed.exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
