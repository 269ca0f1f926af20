//! Command implementations for OxiBz3 CLI.

pub mod compress;
pub mod decompress;
pub mod info;

pub use compress::{CompressArgs, cmd_compress};
pub use decompress::{DecompressArgs, cmd_decompress};
pub use info::cmd_info;
pub use test::cmd_test;
