//! Info command implementation.

use crate::utils::{compression_ratio, format_size};
use oxibz3::{UnitInfo, scan};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON serializable block record.
#[derive(Debug, Serialize, Deserialize)]
struct BlockJson {
    offset: u64,
    compressed_size: usize,
    original_size: usize,
}

/// JSON serializable unit.
#[derive(Debug, Serialize, Deserialize)]
struct UnitJson {
    offset: u64,
    block_size: usize,
    original_size: usize,
    stored_size: usize,
    blocks: Vec<BlockJson>,
}

impl UnitJson {
    fn from_unit(unit: &UnitInfo) -> Self {
        Self {
            offset: unit.offset,
            block_size: unit.block_size,
            original_size: unit.original_size(),
            stored_size: unit.stored_size(),
            blocks: unit
                .blocks
                .iter()
                .map(|b| BlockJson {
                    offset: b.offset,
                    compressed_size: b.compressed_size,
                    original_size: b.original_size,
                })
                .collect(),
        }
    }
}

/// JSON output for `info --json`.
#[derive(Debug, Serialize, Deserialize)]
struct FileInfoJson {
    file: String,
    size: u64,
    original_size: u64,
    ratio: f64,
    units: Vec<UnitJson>,
}

fn describe(path: &Path, size: u64, units: &[UnitInfo]) -> FileInfoJson {
    let original_size = units.iter().map(|u| u.original_size() as u64).sum();
    FileInfoJson {
        file: path.display().to_string(),
        size,
        original_size,
        ratio: compression_ratio(original_size, size),
        units: units.iter().map(UnitJson::from_unit).collect(),
    }
}

pub fn cmd_info(path: &Path, json: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let size = std::fs::metadata(path)?.len();
    let units = scan(BufReader::new(File::open(path)?))?;
    let info = describe(path, size, &units);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("File Information");
    println!("================");
    println!("File: {}", info.file);
    println!("Size: {} bytes", info.size);
    println!("Units: {}", info.units.len());

    for (i, unit) in info.units.iter().enumerate() {
        println!();
        println!("Unit {} (offset {}):", i, unit.offset);
        println!("  Block size: {}", format_size(unit.block_size as u64));
        println!("  Blocks: {}", unit.blocks.len());
        println!("  Original size: {} bytes", unit.original_size);
        println!("  Stored size: {} bytes", unit.stored_size);
        if verbose {
            for (j, block) in unit.blocks.iter().enumerate() {
                println!(
                    "    #{:<4} @{:<10} {:>10} -> {:>10}",
                    j, block.offset, block.original_size, block.compressed_size
                );
            }
        }
    }

    println!();
    println!("Total original size: {} bytes", info.original_size);
    if info.original_size > 0 {
        println!("Compression ratio: {:.1}%", info.ratio);
    }

    Ok(())
}
