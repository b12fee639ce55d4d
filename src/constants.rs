/// Channels per pixel in an RGBA buffer.
pub const CHANNELS_PER_PIXEL: usize = 4;

/// Colour channels per pixel that carry hidden bits (R, G, B).
pub const DATA_CHANNELS_PER_PIXEL: usize = 3;

/// Channels reserved for the plaintext header.
/// The whole first pixel is reserved, its R, G and B each carry one header bit.
pub const HEADER_CHANNELS: usize = CHANNELS_PER_PIXEL;

/// Width of the header value in bits. It stores `bits_taken - 1`.
pub const HEADER_BITS: usize = 3;

/// Smallest number of low bits taken from each colour channel.
pub const MIN_BITS_TAKEN: u8 = 1;

/// Largest number of low bits taken from each colour channel.
pub const MAX_BITS_TAKEN: u8 = 8;

/// Value stored in every alpha channel visited by the writer.
pub const ALPHA_SENTINEL: u8 = 255;

/// AES-256 key length in bytes.
pub const KEY_SIZE: usize = 32;

/// AES-GCM nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Bytes the AEAD envelope adds around the packed file: nonce || ciphertext || tag.
pub const AEAD_OVERHEAD: usize = NONCE_SIZE + TAG_SIZE;

/// Longest file name, in UTF-8 bytes, that the one-byte length prefix can describe.
pub const MAX_NAME_LEN: usize = u8::MAX as usize;

/// Fixed part of a packed file: name length (1 byte) + content length (4 bytes).
pub const PACKED_HEADER_SIZE: usize = 1 + 4;
