//! # Channel cursor
//!
//! Sequential bit-level access to an RGBA channel buffer.
//!
//! The first pixel carries a plaintext header: `bits_taken - 1` as three bits,
//! one per colour channel, most significant first. Every later colour channel
//! carries `bits_taken` payload bits in its low bits. Alpha channels never carry
//! data; the writer stamps them with [`ALPHA_SENTINEL`] and the reader skips them.

use rand::{CryptoRng, RngCore};

use crate::capacity::{low_mask, validate_bits_taken};
use crate::constants::{ALPHA_SENTINEL, CHANNELS_PER_PIXEL, HEADER_BITS, HEADER_CHANNELS};
use crate::error::{Error, Result};

fn is_alpha(index: usize) -> bool {
    index % CHANNELS_PER_PIXEL == CHANNELS_PER_PIXEL - 1
}

/// Writes a header and payload into a channel buffer.
///
/// A buffer is only well-formed once [`ChannelWriter::write_payload`] has run
/// to completion; it fills every remaining channel with random bits.
pub struct ChannelWriter<'a> {
    buffer: &'a mut [u8],
    cursor: usize,
    acc: u8,
    acc_bits: u8,
}

impl<'a> ChannelWriter<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            acc: 0,
            acc_bits: 0,
        }
    }

    /// Current channel index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replaces the low `width` bits of the current channel with `value` and
    /// advances, stepping over the next channel if it is an alpha channel.
    fn write_channel(&mut self, value: u8, width: u8) -> Result<()> {
        let len = self.buffer.len();
        let channel = self.buffer.get_mut(self.cursor).ok_or(Error::CursorMismatch {
            cursor: self.cursor,
            len,
        })?;
        let mask = low_mask(width);
        *channel = (*channel & !mask) | (value & mask);
        self.cursor += 1;

        if self.cursor < len && is_alpha(self.cursor) {
            self.buffer[self.cursor] = ALPHA_SENTINEL;
            self.cursor += 1;
        }

        Ok(())
    }

    /// Writes `bits_taken - 1` into the first three channels, one bit each.
    ///
    /// Leaves the cursor on the first payload channel.
    pub fn write_header(&mut self, bits_taken: u8) -> Result<()> {
        let bits_taken = validate_bits_taken(bits_taken as u32)?;
        let value = bits_taken - 1;

        for shift in (0..HEADER_BITS).rev() {
            self.write_channel((value >> shift) & 1, 1)?;
        }

        Ok(())
    }

    /// Writes `payload` MSB-first, `bits_taken` bits per channel, then fills the
    /// rest of the buffer with random bits from `rng`.
    ///
    /// # Errors
    ///
    /// [`Error::CursorMismatch`] if the payload overruns the buffer or the
    /// cursor does not finish exactly at its end.
    pub fn write_payload<R>(&mut self, payload: &[u8], bits_taken: u8, rng: &mut R) -> Result<()>
    where
        R: RngCore + CryptoRng,
    {
        let bits_taken = validate_bits_taken(bits_taken as u32)?;

        for &byte in payload {
            for shift in (0..8).rev() {
                self.acc = (self.acc << 1) | ((byte >> shift) & 1);
                self.acc_bits += 1;

                if self.acc_bits == bits_taken {
                    self.write_channel(self.acc, bits_taken)?;
                    self.acc = 0;
                    self.acc_bits = 0;
                }
            }
        }

        if self.acc_bits > 0 {
            // Pad the boundary channel so real and filler bits look alike.
            let missing = bits_taken - self.acc_bits;
            let filler = (rng.next_u32() as u8) & low_mask(missing);
            let value = ((self.acc as u16) << missing) as u8 | filler;
            self.write_channel(value, bits_taken)?;
            self.acc = 0;
            self.acc_bits = 0;
        }

        let len = self.buffer.len();
        while self.cursor < len {
            let noise = rng.next_u32() as u8;
            self.write_channel(noise, bits_taken)?;
        }

        if self.cursor != len {
            return Err(Error::CursorMismatch {
                cursor: self.cursor,
                len,
            });
        }

        Ok(())
    }
}

/// Reads a header and payload back out of a channel buffer.
pub struct ChannelReader<'a> {
    buffer: &'a [u8],
    cursor: usize,
    acc: u16,
    acc_bits: u8,
}

impl<'a> ChannelReader<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            cursor: 0,
            acc: 0,
            acc_bits: 0,
        }
    }

    /// Recovers `bits_taken` from the low bits of channels 0, 1 and 2.
    ///
    /// # Errors
    ///
    /// * [`Error::CorruptHeader`] if the buffer is shorter than one pixel.
    /// * [`Error::BitsOutOfRange`] if the decoded value is not in `1..=8`.
    pub fn read_header(&mut self) -> Result<u8> {
        let header = self.buffer.get(..HEADER_BITS).ok_or(Error::CorruptHeader)?;
        let value = header
            .iter()
            .fold(0u32, |acc, &channel| (acc << 1) | (channel & 1) as u32);
        self.cursor = HEADER_CHANNELS;

        validate_bits_taken(value + 1)
    }

    /// Reads every payload channel and returns the first `byte_count` bytes.
    ///
    /// The bit stream has no end marker; `byte_count` must come from the same
    /// capacity computation the writer used.
    pub fn read_payload(&mut self, bits_taken: u8, byte_count: usize) -> Result<Vec<u8>> {
        let bits_taken = validate_bits_taken(bits_taken as u32)?;
        let mask = low_mask(bits_taken) as u16;
        let mut output = Vec::with_capacity(byte_count);

        self.cursor = self.cursor.max(HEADER_CHANNELS);
        while self.cursor < self.buffer.len() && output.len() < byte_count {
            let index = self.cursor;
            self.cursor += 1;
            if is_alpha(index) {
                continue;
            }

            self.acc = (self.acc << bits_taken) | (self.buffer[index] as u16 & mask);
            self.acc_bits += bits_taken;

            if self.acc_bits >= 8 {
                self.acc_bits -= 8;
                output.push((self.acc >> self.acc_bits) as u8);
                self.acc &= (1u16 << self.acc_bits) - 1;
            }
        }

        output.truncate(byte_count);

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_header_bits_msb_first() {
        let mut buffer = vec![0u8; 8];
        ChannelWriter::new(&mut buffer).write_header(6).unwrap();
        // 6 - 1 = 0b101
        assert_eq!(&buffer[..4], &[1, 0, 1, ALPHA_SENTINEL]);
    }

    #[test]
    fn test_header_roundtrip_for_all_bits() {
        for b in 1..=8u8 {
            let mut buffer = vec![0xAA; 4];
            let mut writer = ChannelWriter::new(&mut buffer);
            writer.write_header(b).unwrap();
            assert_eq!(writer.cursor(), 4);
            assert_eq!(ChannelReader::new(&buffer).read_header().unwrap(), b);
        }
    }

    #[test]
    fn test_header_preserves_high_bits() {
        let mut buffer = vec![0xFF; 4];
        ChannelWriter::new(&mut buffer).write_header(1).unwrap();
        assert_eq!(&buffer[..3], &[0xFE, 0xFE, 0xFE]);
    }

    #[test]
    fn test_read_header_too_short() {
        assert_eq!(
            ChannelReader::new(&[1, 1]).read_header(),
            Err(Error::CorruptHeader)
        );
    }

    #[test]
    fn test_header_ignores_other_channels() {
        let mut buffer = vec![0u8; 64];
        ChannelWriter::new(&mut buffer).write_header(4).unwrap();
        for (i, channel) in buffer.iter_mut().enumerate().skip(3) {
            *channel = i as u8 ^ 0x5A;
        }
        assert_eq!(ChannelReader::new(&buffer).read_header().unwrap(), 4);
    }

    #[test]
    fn test_payload_roundtrip_each_width() {
        let payload: Vec<u8> = (0..40).map(|i| (i * 37 + 11) as u8).collect();
        for b in 1..=8u8 {
            let pixels = 1 + (payload.len() * 8).div_ceil(3 * b as usize) + 3;
            let mut buffer = vec![0x33; pixels * 4];

            let mut writer = ChannelWriter::new(&mut buffer);
            writer.write_header(b).unwrap();
            writer.write_payload(&payload, b, &mut rng()).unwrap();
            assert_eq!(writer.cursor(), pixels * 4);

            let mut reader = ChannelReader::new(&buffer);
            assert_eq!(reader.read_header().unwrap(), b);
            assert_eq!(reader.read_payload(b, payload.len()).unwrap(), payload);
        }
    }

    #[test]
    fn test_every_alpha_gets_sentinel() {
        let mut buffer = vec![0u8; 40];
        let mut writer = ChannelWriter::new(&mut buffer);
        writer.write_header(3).unwrap();
        writer.write_payload(b"ab", 3, &mut rng()).unwrap();
        for alpha in buffer.iter().skip(3).step_by(4) {
            assert_eq!(*alpha, ALPHA_SENTINEL);
        }
    }

    #[test]
    fn test_only_low_bits_change() {
        let original = vec![0b1010_0000u8; 48];
        let mut buffer = original.clone();
        let mut writer = ChannelWriter::new(&mut buffer);
        writer.write_header(2).unwrap();
        writer.write_payload(b"xyz", 2, &mut rng()).unwrap();
        for (i, (&before, &after)) in original.iter().zip(&buffer).enumerate() {
            if !is_alpha(i) {
                assert_eq!(before & !0b11, after & !0b11, "channel {i}");
            }
        }
    }

    #[test]
    fn test_payload_overrun_is_cursor_mismatch() {
        let mut buffer = vec![0u8; 8];
        let mut writer = ChannelWriter::new(&mut buffer);
        writer.write_header(1).unwrap();
        assert!(matches!(
            writer.write_payload(b"too long", 1, &mut rng()),
            Err(Error::CursorMismatch { .. })
        ));
    }

    #[test]
    fn test_read_payload_skips_alpha() {
        // Pixel 1 = (0b1, 0b0, 0b1, alpha), pixel 2 = (0b1, 0b1, 0b0, alpha),
        // pixel 3 = (0b0, 0b1, 0b0, alpha): bits 1011 1001 = 0xB9.
        let buffer = [
            0, 0, 0, 0, //
            1, 0, 1, 0xFF, //
            1, 1, 0, 0xFF, //
            0, 1, 0, 0xFF,
        ];
        let mut reader = ChannelReader::new(&buffer);
        assert_eq!(reader.read_payload(1, 1).unwrap(), vec![0xB9]);
    }

    #[test]
    fn test_empty_payload_fills_with_noise() {
        let mut buffer = vec![0u8; 4 * 64];
        let mut writer = ChannelWriter::new(&mut buffer);
        writer.write_header(8).unwrap();
        writer.write_payload(&[], 8, &mut rng()).unwrap();
        assert_eq!(writer.cursor(), buffer.len());
        assert!(
            buffer
                .iter()
                .enumerate()
                .skip(4)
                .any(|(i, &c)| !is_alpha(i) && c != 0)
        );
    }
}
