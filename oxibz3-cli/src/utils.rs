//! Utility functions for the CLI.

use dialoguer::Confirm;
use filetime::FileTime;
use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

/// Suffix of compressed files.
pub const EXTENSION: &str = "bz3";

/// Create a byte progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
        .map(|s| s.progress_chars("█▓▒░ "))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

/// `file.txt` -> `file.txt.bz3`
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(EXTENSION);
    PathBuf::from(name)
}

/// `file.txt.bz3` -> `file.txt`; `None` when the suffix is missing.
pub fn decompressed_path(input: &Path) -> Option<PathBuf> {
    match input.extension() {
        Some(ext) if ext == EXTENSION && input.file_stem().is_some() => {
            Some(input.with_extension(""))
        }
        _ => None,
    }
}

/// Fail if `path` exists, unless `force` is set or the user agrees to
/// overwrite it at an interactive prompt.
pub fn confirm_overwrite(path: &Path, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    if force || !path.exists() {
        return Ok(());
    }

    if io::stdin().is_terminal() && io::stderr().is_terminal() {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} already exists. Overwrite?", path.display()))
            .default(false)
            .interact()?;
        if overwrite {
            return Ok(());
        }
    }

    Err(format!("{} already exists (use --force to overwrite)", path.display()).into())
}

/// Give `dst` the modification time of `src`.
pub fn copy_mtime(src: &Path, dst: &Path) -> io::Result<()> {
    let metadata = fs::metadata(src)?;
    filetime::set_file_mtime(dst, FileTime::from_last_modification_time(&metadata))
}

/// Space saved, in percent of `original`.
pub fn compression_ratio(original: u64, stored: u64) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (1.0 - stored as f64 / original as f64) * 100.0
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
