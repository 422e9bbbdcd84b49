//! Command line interface for the `lineframe` binary.
//!
//! Describes the options for decoding a newline-delimited JSON stream from a
//! file or standard input. Shared with the build script for man page
//! generation.

use std::path::PathBuf;

use clap::Parser;

/// Command line arguments for the `lineframe` binary.
#[derive(Debug, Parser)]
#[command(
    name = "lineframe",
    version,
    about = "Decode a terminator-delimited JSON stream"
)]
pub struct Cli {
    /// File to read; standard input when omitted.
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Record terminator as a byte value (0-255).
    #[arg(short, long, default_value_t = b'\n')]
    pub terminator: u8,

    /// Bytes read from the source per chunk.
    #[arg(short, long, default_value_t = 8 * 1024)]
    pub chunk_size: usize,

    /// Skip records that fail to decode instead of stopping.
    #[arg(long)]
    pub skip_errors: bool,
}
