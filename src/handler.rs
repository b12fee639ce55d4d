//! # Command handlers
//!
//! Business logic for each subcommand: file I/O, calling into the codec and
//! reporting results to the user.

use crate::capacity::validate_bits_taken;
use crate::cli::{CapacityArgs, HideArgs, KeygenArgs, RevealArgs};
use crate::codec::StegCodec;
use crate::crypto::{format_key, generate_key, parse_key};
use crate::packer::HiddenFile;
use crate::pipeline::{PngPipeline, RgbaFrame};
use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback name for a recovered file whose stored name is not usable as a path.
const FALLBACK_NAME: &str = "recovered.bin";

fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

fn open_image(path: &Path) -> Result<RgbaFrame> {
    RgbaFrame::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })
}

/// `doctored_<stem>.png` next to the cover image.
fn default_dest(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    image.with_file_name(format!("doctored_{stem}.png"))
}

/// The recovered name reduced to a bare file name, placed next to the image.
fn default_out(image: &Path, name: &str) -> PathBuf {
    let name = Path::new(name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| FALLBACK_NAME.into());
    image.with_file_name(name)
}

/// Handles `hide`.
///
/// Reads the cover image and the file, encrypts and hides the file, checks
/// that the rendered PNG decodes back to the written pixels, and saves it.
///
/// # Errors
///
/// * The image, file or key cannot be read or parsed.
/// * The output exists and `--force` was not given.
/// * The image does not have enough space for the file.
/// * The rendered image fails verification or cannot be written.
pub fn handle_hide(args: HideArgs) -> Result<()> {
    let mut frame = open_image(&args.image)?;

    let content = fs::read(&args.file).with_context(|| {
        format!(
            "Unable to read file to hide: {}",
            args.file.to_string_lossy().red().bold()
        )
    })?;
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_NAME.to_string());

    let key = parse_key(&args.key).context("The key must be 64 hexadecimal characters.")?;
    let bits = validate_bits_taken(args.bits)?;

    let dest = args.dest.unwrap_or_else(|| default_dest(&args.image));
    ensure_writable(&dest, args.force)?;

    let mut codec = StegCodec::new();
    let available = codec.max_content_len(frame.pixels.len(), bits, name.len())?;
    anyhow::ensure!(
        content.len() <= available,
        "Not enough space in the image to hide the file. \nRequired: {}, Available: {}",
        content.len().to_string().red().bold(),
        available.to_string().green().bold()
    );

    let file = HiddenFile::new(name, content);
    let encoded = codec
        .hide_verified(&mut frame, &file, &key, bits, &PngPipeline)
        .with_context(|| {
            format!(
                "Failed to hide {} in the image.",
                file.name.red().bold()
            )
        })?;

    fs::write(&dest, encoded).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} ({} bytes, {} bits per channel) has been hidden and saved: {}",
        file.name.green().bold(),
        file.content.len().to_string().green(),
        bits.to_string().green(),
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// Handles `reveal`.
///
/// # Errors
///
/// * The image or key cannot be read or parsed.
/// * The image holds no hidden file, was altered, or the key is wrong.
/// * The output exists and `--force` was not given, or cannot be written.
pub fn handle_reveal(args: RevealArgs) -> Result<()> {
    let frame = open_image(&args.image)?;
    let key = parse_key(&args.key).context("The key must be 64 hexadecimal characters.")?;

    let file = StegCodec::new()
        .reveal(&frame.pixels, &key)
        .with_context(|| {
            format!(
                "Failed to recover a file from '{}'. \nThe key may be wrong, or the image holds no hidden file or was modified.",
                args.image.to_string_lossy().red().bold()
            )
        })?;

    let out = args
        .out
        .unwrap_or_else(|| default_out(&args.image, &file.name));
    ensure_writable(&out, args.force)?;

    fs::write(&out, &file.content).with_context(|| {
        format!(
            "Unable to write recovered file: {}",
            out.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} ({} bytes) has been recovered and saved: {}",
        file.name.green().bold(),
        file.content.len().to_string().green(),
        out.to_string_lossy().green().bold()
    );

    Ok(())
}

/// Handles `keygen`.
///
/// Prints the key, or writes it to `--out` followed by a newline.
pub fn handle_keygen(args: KeygenArgs) -> Result<()> {
    let key = format_key(&generate_key());

    let Some(out) = args.out else {
        println!("{key}");
        return Ok(());
    };

    ensure_writable(&out, args.force)?;
    fs::write(&out, format!("{key}\n")).with_context(|| {
        format!(
            "Unable to write key file: {}",
            out.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "A new key has been saved: {}",
        out.to_string_lossy().green().bold()
    );

    Ok(())
}

/// Handles `capacity`.
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let frame = open_image(&args.image)?;
    let bits = validate_bits_taken(args.bits)?;

    let codec = StegCodec::new();
    let capacity = codec.capacity(frame.pixels.len(), bits)?;
    let content = codec.max_content_len(frame.pixels.len(), bits, 0)?;

    println!(
        "{}x{} image, {} bits per channel: {} bytes of ciphertext, up to {} bytes of file content minus the file name length",
        frame.width,
        frame.height,
        bits.to_string().green(),
        capacity.to_string().green().bold(),
        content.to_string().green().bold()
    );

    Ok(())
}
