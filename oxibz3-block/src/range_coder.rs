//! Adaptive binary range coder.
//!
//! - 32-bit range, renormalised when it drops below 2^24
//! - 11-bit probabilities, adapted by 1/32 of the distance after each bit
//! - carry propagation through a cached byte, so the first output byte is
//!   always `0x00`
//!
//! The decoder reads from a slice and reports exhaustion as
//! [`Status::TruncatedData`] instead of blocking on a reader.

use oxibz3_core::Status;

/// Number of bits in a probability.
pub const PROB_BITS: u32 = 11;

/// Initial probability (50%).
pub const PROB_INIT: u16 = 1 << (PROB_BITS - 1);

const PROB_MAX: u16 = 1 << PROB_BITS;
const MOVE_BITS: u32 = 5;
const TOP: u32 = 1 << 24;

/// Range encoder writing into an owned buffer.
#[derive(Debug)]
pub struct RangeEncoder {
    out: Vec<u8>,
    range: u32,
    low: u64,
    cache: u8,
    pending: u64,
}

impl RangeEncoder {
    /// Create an encoder with room for about `capacity` output bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: Vec::with_capacity(capacity),
            range: 0xFFFF_FFFF,
            low: 0,
            cache: 0,
            pending: 1,
        }
    }

    fn shift_low(&mut self) {
        // Emit the cached byte plus any run of 0xFF behind it once the carry
        // into bit 32 is settled.
        if self.low < 0xFF00_0000 || self.low > 0xFFFF_FFFF {
            let carry = (self.low >> 32) as u8;
            let mut byte = self.cache;
            while self.pending > 0 {
                self.out.push(byte.wrapping_add(carry));
                byte = 0xFF;
                self.pending -= 1;
            }
            self.cache = (self.low >> 24) as u8;
        }
        self.pending += 1;
        self.low = (self.low << 8) & 0xFFFF_FFFF;
    }

    /// Encode one bit under an adaptive probability.
    #[inline]
    pub fn encode_bit(&mut self, prob: &mut u16, bit: u32) {
        let bound = (self.range >> PROB_BITS) * u32::from(*prob);
        if bit == 0 {
            self.range = bound;
            *prob += (PROB_MAX - *prob) >> MOVE_BITS;
        } else {
            self.low += u64::from(bound);
            self.range -= bound;
            *prob -= *prob >> MOVE_BITS;
        }
        if self.range < TOP {
            self.range <<= 8;
            self.shift_low();
        }
    }

    /// Encode the low `num_bits` of `value`, most significant first, walking
    /// a binary tree of probabilities (`probs.len() >= 1 << num_bits`).
    pub fn encode_bit_tree(&mut self, probs: &mut [u16], num_bits: u32, value: u32) {
        let mut index = 1usize;
        for i in (0..num_bits).rev() {
            let bit = (value >> i) & 1;
            self.encode_bit(&mut probs[index], bit);
            index = (index << 1) | bit as usize;
        }
    }

    /// Flush pending state and return the encoded bytes.
    pub fn finish(mut self) -> Vec<u8> {
        for _ in 0..5 {
            self.shift_low();
        }
        self.out
    }
}

/// Range decoder over a byte slice.
#[derive(Debug)]
pub struct RangeDecoder<'a> {
    input: &'a [u8],
    pos: usize,
    range: u32,
    code: u32,
}

impl<'a> RangeDecoder<'a> {
    /// Start decoding `input`.
    ///
    /// The stream must begin with the `0x00` byte every encoder emits first.
    pub fn new(input: &'a [u8]) -> Result<Self, Status> {
        if input.len() < 5 {
            return Err(Status::TruncatedData);
        }
        if input[0] != 0x00 {
            return Err(Status::MalformedHeader);
        }
        let code = u32::from_be_bytes([input[1], input[2], input[3], input[4]]);
        Ok(Self {
            input,
            pos: 5,
            range: 0xFFFF_FFFF,
            code,
        })
    }

    #[inline]
    fn normalize(&mut self) -> Result<(), Status> {
        if self.range < TOP {
            let byte = *self.input.get(self.pos).ok_or(Status::TruncatedData)?;
            self.pos += 1;
            self.range <<= 8;
            self.code = (self.code << 8) | u32::from(byte);
        }
        Ok(())
    }

    /// Decode one bit under an adaptive probability.
    #[inline]
    pub fn decode_bit(&mut self, prob: &mut u16) -> Result<u32, Status> {
        self.normalize()?;
        let bound = (self.range >> PROB_BITS) * u32::from(*prob);
        if self.code < bound {
            self.range = bound;
            *prob += (PROB_MAX - *prob) >> MOVE_BITS;
            Ok(0)
        } else {
            self.range -= bound;
            self.code -= bound;
            *prob -= *prob >> MOVE_BITS;
            Ok(1)
        }
    }

    /// Decode `num_bits` bits written by [`RangeEncoder::encode_bit_tree`].
    pub fn decode_bit_tree(&mut self, probs: &mut [u16], num_bits: u32) -> Result<u32, Status> {
        let mut index = 1usize;
        for _ in 0..num_bits {
            let bit = self.decode_bit(&mut probs[index])?;
            index = (index << 1) | bit as usize;
        }
        Ok(index as u32 - (1 << num_bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_byte_is_zero() {
        let mut enc = RangeEncoder::with_capacity(16);
        let mut prob = PROB_INIT;
        enc.encode_bit(&mut prob, 1);
        let out = enc.finish();
        assert_eq!(out[0], 0x00);
        assert!(out.len() >= 5);
    }

    #[test]
    fn test_encode_decode_bits() {
        let bits = [0u32, 1, 0, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1];
        let mut enc = RangeEncoder::with_capacity(16);
        let mut prob = PROB_INIT;
        for &bit in &bits {
            enc.encode_bit(&mut prob, bit);
        }
        let out = enc.finish();

        let mut dec = RangeDecoder::new(&out).unwrap();
        let mut prob = PROB_INIT;
        for &bit in &bits {
            assert_eq!(dec.decode_bit(&mut prob).unwrap(), bit);
        }
    }

    #[test]
    fn test_bit_tree_roundtrip() {
        let values: Vec<u32> = (0..2000).map(|i| (i * 7919 % 256) as u32).collect();
        let mut enc = RangeEncoder::with_capacity(values.len());
        let mut probs = vec![PROB_INIT; 256];
        for &v in &values {
            enc.encode_bit_tree(&mut probs, 8, v);
        }
        let out = enc.finish();

        let mut dec = RangeDecoder::new(&out).unwrap();
        let mut probs = vec![PROB_INIT; 256];
        for &v in &values {
            assert_eq!(dec.decode_bit_tree(&mut probs, 8).unwrap(), v);
        }
    }

    #[test]
    fn test_decoder_rejects_bad_start() {
        assert_eq!(
            RangeDecoder::new(&[0x01, 0, 0, 0, 0]).unwrap_err(),
            Status::MalformedHeader
        );
        assert_eq!(RangeDecoder::new(&[0, 0]).unwrap_err(), Status::TruncatedData);
    }

    #[test]
    fn test_decoder_reports_exhaustion() {
        let mut enc = RangeEncoder::with_capacity(64);
        let mut probs = vec![PROB_INIT; 256];
        for v in 0..200u32 {
            enc.encode_bit_tree(&mut probs, 8, v);
        }
        let out = enc.finish();

        let mut dec = RangeDecoder::new(&out[..8]).unwrap();
        let mut probs = vec![PROB_INIT; 256];
        let mut result = Ok(0);
        for _ in 0..200 {
            result = dec.decode_bit_tree(&mut probs, 8);
            if result.is_err() {
                break;
            }
        }
        assert_eq!(result, Err(Status::TruncatedData));
    }
}
