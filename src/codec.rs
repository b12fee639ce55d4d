//! # Hide and reveal
//!
//! `hide`: pack + pad → encrypt → write header and payload.
//! `reveal`: read header → read payload → decrypt → unpack.
//!
//! The ciphertext always fills the whole image capacity, so the amount of
//! hidden data cannot be told from the pixels.

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};

use crate::capacity::{Capacity, validate_bits_taken};
use crate::constants::{CHANNELS_PER_PIXEL, PACKED_HEADER_SIZE};
use crate::crypto::{AeadProvider, AesGcmProvider, SecretKey};
use crate::error::{Error, Result};
use crate::packer::{self, HiddenFile};
use crate::pipeline::{PixelPipeline, RgbaFrame};
use crate::steganography::{ChannelReader, ChannelWriter};

fn check_buffer(pixels: &[u8]) -> Result<()> {
    if pixels.len() % CHANNELS_PER_PIXEL != 0 {
        return Err(Error::MalformedBuffer(pixels.len()));
    }
    Ok(())
}

/// Steganographic codec over RGBA channel buffers.
///
/// `R` supplies the random filler bits; it must be a CSPRNG.
pub struct StegCodec<A, R> {
    aead: A,
    rng: R,
}

impl StegCodec<AesGcmProvider, OsRng> {
    /// AES-256-GCM with filler bits from the operating system.
    pub fn new() -> Self {
        Self::with_parts(AesGcmProvider, OsRng)
    }
}

impl Default for StegCodec<AesGcmProvider, OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> StegCodec<A, R>
where
    A: AeadProvider,
    R: RngCore + CryptoRng,
{
    pub fn with_parts(aead: A, rng: R) -> Self {
        Self { aead, rng }
    }

    /// Bytes of ciphertext the buffer holds at `bits_taken`.
    pub fn capacity(&self, channels: usize, bits_taken: u8) -> Result<usize> {
        let bits_taken = validate_bits_taken(bits_taken as u32)?;
        Ok(Capacity::of(channels, bits_taken).bytes)
    }

    /// Largest content length that fits alongside a name of `name_len` bytes.
    pub fn max_content_len(&self, channels: usize, bits_taken: u8, name_len: usize) -> Result<usize> {
        let overhead = self.aead.overhead() + PACKED_HEADER_SIZE + name_len;
        Ok(self.capacity(channels, bits_taken)?.saturating_sub(overhead))
    }

    /// Encrypts `file` and hides it in `pixels`.
    ///
    /// Nothing in `pixels` changes unless the call succeeds up to the write,
    /// so an oversized file leaves the buffer untouched.
    ///
    /// # Errors
    ///
    /// * [`Error::BitsOutOfRange`], [`Error::MalformedBuffer`], [`Error::InvalidName`].
    /// * [`Error::FileTooLarge`] if the file does not fit.
    /// * [`Error::EncryptionSizeMismatch`] or [`Error::CursorMismatch`] on an
    ///   internal accounting fault.
    pub fn hide(
        &mut self,
        pixels: &mut [u8],
        file: &HiddenFile,
        key: &SecretKey,
        bits_taken: u8,
    ) -> Result<()> {
        let bits_taken = validate_bits_taken(bits_taken as u32)?;
        check_buffer(pixels)?;

        let capacity = Capacity::of(pixels.len(), bits_taken).bytes;
        let overhead = self.aead.overhead();
        let needed = file.packed_len() + overhead;
        let padded_len = capacity.saturating_sub(overhead);
        let packed = match packer::pack_with_padding(&file.name, &file.content, padded_len) {
            Err(Error::LengthTooSmall { .. }) => {
                return Err(Error::FileTooLarge {
                    needed,
                    available: capacity,
                });
            }
            other => other?,
        };

        let ciphertext = self.aead.encrypt(key, &packed)?;
        if ciphertext.len() != capacity {
            return Err(Error::EncryptionSizeMismatch {
                expected: capacity,
                actual: ciphertext.len(),
            });
        }

        let mut writer = ChannelWriter::new(pixels);
        writer.write_header(bits_taken)?;
        writer.write_payload(&ciphertext, bits_taken, &mut self.rng)
    }

    /// Hides `file` in `frame`, renders it through `pipeline` and checks that
    /// decoding the rendered image gives back exactly the written pixels.
    ///
    /// Returns the rendered image.
    pub fn hide_verified<P: PixelPipeline>(
        &mut self,
        frame: &mut RgbaFrame,
        file: &HiddenFile,
        key: &SecretKey,
        bits_taken: u8,
        pipeline: &P,
    ) -> Result<Vec<u8>> {
        self.hide(&mut frame.pixels, file, key, bits_taken)?;

        let encoded = pipeline.render(frame)?;
        if pipeline.decode(&encoded)? != *frame {
            return Err(Error::RoundtripVerificationFailed);
        }

        Ok(encoded)
    }

    /// Recovers the file hidden in `pixels`.
    ///
    /// # Errors
    ///
    /// * [`Error::BitsOutOfRange`] or [`Error::CorruptHeader`] if the buffer
    ///   does not hold a header written by this codec.
    /// * [`Error::AuthenticationFailed`] for a wrong key or altered pixels.
    pub fn reveal(&self, pixels: &[u8], key: &SecretKey) -> Result<HiddenFile> {
        check_buffer(pixels)?;

        let mut reader = ChannelReader::new(pixels);
        let bits_taken = reader.read_header()?;
        let capacity = Capacity::of(pixels.len(), bits_taken).bytes;
        let ciphertext = reader.read_payload(bits_taken, capacity)?;

        let packed = self.aead.decrypt(key, &ciphertext)?;
        packer::unpack(&packed)
    }
}
