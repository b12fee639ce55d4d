//! # Packed file format
//!
//! The plaintext that gets encrypted and hidden is a flat record:
//!
//! ```text
//! name_len (u8) | name (UTF-8) | content_len (u32, big-endian) | content | zero padding
//! ```
//!
//! Padding is only present when the record is packed to a target length and is
//! ignored on unpack.

use crate::constants::{MAX_NAME_LEN, PACKED_HEADER_SIZE};
use crate::error::{Error, Result};

/// A named file, either about to be hidden or just recovered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenFile {
    pub name: String,
    pub content: Vec<u8>,
}

impl HiddenFile {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Size of this file once packed, without padding.
    pub fn packed_len(&self) -> usize {
        PACKED_HEADER_SIZE + self.name.len() + self.content.len()
    }
}

/// Packs `name` and `content` into the flat record layout.
///
/// # Errors
///
/// * [`Error::InvalidName`] if `name` is empty or longer than 255 bytes.
/// * [`Error::ContentTooLarge`] if `content` does not fit a `u32` length.
pub fn pack(name: &str, content: &[u8]) -> Result<Vec<u8>> {
    let name_len = name.len();
    if name_len == 0 || name_len > MAX_NAME_LEN {
        return Err(Error::InvalidName(name_len));
    }
    let content_len =
        u32::try_from(content.len()).map_err(|_| Error::ContentTooLarge(content.len()))?;

    let mut packed = Vec::with_capacity(PACKED_HEADER_SIZE + name_len + content.len());
    packed.push(name_len as u8);
    packed.extend_from_slice(name.as_bytes());
    packed.extend_from_slice(&content_len.to_be_bytes());
    packed.extend_from_slice(content);

    Ok(packed)
}

/// Packs like [`pack`], then zero-extends the record to exactly `required_len` bytes.
///
/// # Errors
///
/// Everything [`pack`] returns, plus [`Error::LengthTooSmall`] when the record
/// is already longer than `required_len`.
pub fn pack_with_padding(name: &str, content: &[u8], required_len: usize) -> Result<Vec<u8>> {
    let mut packed = pack(name, content)?;
    if required_len < packed.len() {
        return Err(Error::LengthTooSmall {
            required: required_len,
            packed: packed.len(),
        });
    }
    packed.resize(required_len, 0);

    Ok(packed)
}

/// Parses a packed record, ignoring any trailing padding.
///
/// # Errors
///
/// [`Error::CorruptHeader`] if the name length is zero, the name is not UTF-8,
/// or the declared lengths run past the end of `bytes`.
pub fn unpack(bytes: &[u8]) -> Result<HiddenFile> {
    let (&name_len, rest) = bytes.split_first().ok_or(Error::CorruptHeader)?;
    let name_len = name_len as usize;
    if name_len == 0 || rest.len() < name_len + 4 {
        return Err(Error::CorruptHeader);
    }

    let (name, rest) = rest.split_at(name_len);
    let (content_len, rest) = rest.split_at(4);
    let content_len = u32::from_be_bytes([
        content_len[0],
        content_len[1],
        content_len[2],
        content_len[3],
    ]) as usize;

    let content = rest.get(..content_len).ok_or(Error::CorruptHeader)?;
    let name = std::str::from_utf8(name).map_err(|_| Error::CorruptHeader)?;

    Ok(HiddenFile::new(name, content))
}
