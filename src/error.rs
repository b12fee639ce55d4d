//! Error types.
//!
//! Errors raised by the library. The command-line handlers wrap these with
//! `anyhow` context before showing them to the user.

use thiserror::Error;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while packing, hiding or revealing a file.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum Error {
    /// Bits per channel outside `1..=8`. On reveal this means the image was not
    /// produced by this codec or its header was altered.
    #[error("Bits per channel must be between 1 and 8, got {0}")]
    BitsOutOfRange(u32),

    /// File name is empty or longer than 255 UTF-8 bytes.
    #[error("File name must be 1 to 255 UTF-8 bytes long, got {0} bytes")]
    InvalidName(usize),

    /// File content does not fit the 4-byte length field.
    #[error("File content is too large to pack: {0} bytes")]
    ContentTooLarge(usize),

    /// Requested padded length is shorter than the packed file.
    #[error("Requested length {required} is smaller than the packed length {packed}")]
    LengthTooSmall { required: usize, packed: usize },

    /// The file does not fit into the image.
    #[error("File does not fit into the image: need {needed} bytes, have {available} bytes")]
    FileTooLarge { needed: usize, available: usize },

    /// The packed file header is inconsistent with the buffer it was read from.
    #[error("Corrupt packed file header")]
    CorruptHeader,

    /// Channel buffer length is not a whole number of RGBA pixels.
    #[error("Channel buffer length {0} is not a multiple of 4")]
    MalformedBuffer(usize),

    /// Key material is not a 256-bit key.
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// The AEAD provider refused to encrypt.
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Tag verification failed (wrong key or altered image).
    #[error("Decryption failed: wrong key or corrupted image")]
    AuthenticationFailed,

    /// The writer did not finish exactly at the end of the buffer.
    #[error("Internal error: cursor stopped at {cursor}, buffer length is {len}")]
    CursorMismatch { cursor: usize, len: usize },

    /// Ciphertext length differs from the image capacity.
    #[error("Internal error: ciphertext is {actual} bytes, capacity is {expected} bytes")]
    EncryptionSizeMismatch { expected: usize, actual: usize },

    /// Re-decoding the rendered image did not reproduce the written pixels.
    #[error("Rendered image does not decode to the written pixels")]
    RoundtripVerificationFailed,

    /// The rendering pipeline failed to encode or decode an image.
    #[error("Image error: {0}")]
    Image(String),
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e.to_string())
    }
}
