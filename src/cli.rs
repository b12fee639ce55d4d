//! # Command-line interface
//!
//! `clap` definitions for every subcommand.

use clap::Parser;
use std::path::PathBuf;

/// Hide an encrypted file in the least significant bits of a lossless image, or get it back.
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "Hide an encrypted file in the least significant bits of a lossless image (PNG, BMP, TIFF, WebP, QOI). The result is always written as PNG."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Parser, Debug)]
pub enum Commands {
    /// Encrypt a file and hide it in an image.
    Hide(HideArgs),

    /// Recover a hidden file from an image.
    Reveal(RevealArgs),

    /// Generate a random 256-bit key.
    Keygen(KeygenArgs),

    /// Show how much an image can hold.
    Capacity(CapacityArgs),
}

#[derive(Parser, Debug)]
pub struct HideArgs {
    /// Cover image.
    #[arg(short, long)]
    pub image: PathBuf,

    /// File to hide.
    #[arg(short, long)]
    pub file: PathBuf,

    /// Key as 64 hex characters.
    #[arg(short, long)]
    pub key: String,

    /// Output image. Defaults to `doctored_<image>.png` next to the cover.
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Low bits taken from each colour channel (1-8).
    #[arg(short, long, default_value_t = 1)]
    pub bits: u32,

    /// Overwrite the output if it exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct RevealArgs {
    /// Image holding a hidden file.
    #[arg(short, long)]
    pub image: PathBuf,

    /// Key as 64 hex characters.
    #[arg(short, long)]
    pub key: String,

    /// Output path. Defaults to the hidden file's own name next to the image.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite the output if it exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct KeygenArgs {
    /// Write the key to this file instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Overwrite the output if it exists.
    #[arg(long)]
    pub force: bool,
}

#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// Image to measure.
    #[arg(short, long)]
    pub image: PathBuf,

    /// Low bits taken from each colour channel (1-8).
    #[arg(short, long, default_value_t = 1)]
    pub bits: u32,
}
