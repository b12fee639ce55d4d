//! Channel capacity of an RGBA buffer.
//!
//! Capacity depends only on the buffer length and the number of bits taken
//! per channel, never on the payload, so `hide` and `reveal` always agree on
//! how many ciphertext bytes the image holds.

use crate::constants::{
    CHANNELS_PER_PIXEL, DATA_CHANNELS_PER_PIXEL, HEADER_CHANNELS, MAX_BITS_TAKEN, MIN_BITS_TAKEN,
};
use crate::error::{Error, Result};

/// Usable payload space of a channel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    pub bits: usize,
    pub bytes: usize,
}

impl Capacity {
    /// Computes the capacity of a buffer of `channels` channels.
    ///
    /// The first pixel holds the header and contributes nothing. Buffers too
    /// short to hold the header have zero capacity.
    pub fn of(channels: usize, bits_taken: u8) -> Self {
        let pixels = channels.saturating_sub(HEADER_CHANNELS) / CHANNELS_PER_PIXEL;
        let bits = pixels * DATA_CHANNELS_PER_PIXEL * bits_taken as usize;

        Self {
            bits,
            bytes: bits / 8,
        }
    }
}

/// Checks that `bits` is a valid number of low bits per channel.
pub fn validate_bits_taken(bits: u32) -> Result<u8> {
    match u8::try_from(bits) {
        Ok(b) if (MIN_BITS_TAKEN..=MAX_BITS_TAKEN).contains(&b) => Ok(b),
        _ => Err(Error::BitsOutOfRange(bits)),
    }
}

/// Mask selecting the low `bits` bits of a channel.
pub(crate) fn low_mask(bits: u8) -> u8 {
    ((1u16 << bits) - 1) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_pixel_capacity() {
        assert_eq!(Capacity::of(16, 1), Capacity { bits: 9, bytes: 1 });
        assert_eq!(Capacity::of(16, 8), Capacity { bits: 72, bytes: 9 });
    }

    #[test]
    fn test_capacity_formula_holds_for_all_lengths() {
        for pixels in 1..=256usize {
            let len = pixels * 4;
            for b in 1..=8u8 {
                let expected_bits = (pixels - 1) * 3 * b as usize;
                let cap = Capacity::of(len, b);
                assert_eq!(cap.bits, expected_bits);
                assert_eq!(cap.bytes, expected_bits / 8);
            }
        }
    }

    #[test]
    fn test_empty_buffer_has_no_capacity() {
        assert_eq!(Capacity::of(0, 8), Capacity { bits: 0, bytes: 0 });
        assert_eq!(Capacity::of(4, 8), Capacity { bits: 0, bytes: 0 });
    }

    #[test]
    fn test_validate_bits_taken() {
        for b in 1..=8 {
            assert_eq!(validate_bits_taken(b), Ok(b as u8));
        }
        assert_eq!(validate_bits_taken(0), Err(Error::BitsOutOfRange(0)));
        assert_eq!(validate_bits_taken(9), Err(Error::BitsOutOfRange(9)));
        assert_eq!(validate_bits_taken(300), Err(Error::BitsOutOfRange(300)));
    }

    #[test]
    fn test_low_mask() {
        assert_eq!(low_mask(1), 0b1);
        assert_eq!(low_mask(3), 0b111);
        assert_eq!(low_mask(8), 0xFF);
    }
}
