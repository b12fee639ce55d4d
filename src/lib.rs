//! # pixel_vault
//!
//! Hides an AES-256-GCM encrypted file in the low bits of an RGBA image and
//! recovers it with the same key.
//!
//! [`codec::StegCodec`] is the entry point; the other modules are its parts.

pub mod capacity;
pub mod cli;
pub mod codec;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod handler;
pub mod packer;
pub mod pipeline;
pub mod steganography;

pub use codec::StegCodec;
pub use error::{Error, Result};
pub use packer::HiddenFile;
