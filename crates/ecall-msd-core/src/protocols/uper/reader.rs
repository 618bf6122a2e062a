use super::error::UperError;

/// MSB-first bit cursor over an unaligned payload.
///
/// Every read is width-checked against the remaining bits; a short read
/// leaves the cursor where it was and reports the offset.
pub struct BitReader<'a> {
    payload: &'a [u8],
    bit_pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            bit_pos: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.bit_pos
    }

    pub fn bit_len(&self) -> usize {
        self.payload.len() * 8
    }

    pub fn remaining_bits(&self) -> usize {
        self.bit_len().saturating_sub(self.bit_pos)
    }

    pub fn require_bits(&self, needed: u32) -> Result<(), UperError> {
        if self.remaining_bits() < needed as usize {
            return Err(UperError::Truncated {
                bit_offset: self.bit_pos,
                needed,
                available: self.remaining_bits(),
            });
        }
        Ok(())
    }

    pub fn read_bool(&mut self) -> Result<bool, UperError> {
        Ok(self.read_uint(1)? == 1)
    }

    /// Reads an unsigned field of `width` bits (at most 64).
    pub fn read_uint(&mut self, width: u32) -> Result<u64, UperError> {
        debug_assert!(width <= u64::BITS);
        self.require_bits(width)?;
        let mut value = 0u64;
        for _ in 0..width {
            let byte = self.payload[self.bit_pos / 8];
            let bit = (byte >> (7 - self.bit_pos % 8)) & 1;
            value = (value << 1) | u64::from(bit);
            self.bit_pos += 1;
        }
        Ok(value)
    }

    /// Reads a two's-complement field of `width` bits.
    pub fn read_int(&mut self, width: u32) -> Result<i64, UperError> {
        let raw = self.read_uint(width)?;
        if width == 0 || width >= i64::BITS {
            return Ok(raw as i64);
        }
        let shift = i64::BITS - width;
        Ok(((raw << shift) as i64) >> shift)
    }

    /// Checks that only zero padding up to the next octet remains.
    pub fn finish(&self) -> Result<(), UperError> {
        let octets = self.payload.len();
        if self.bit_pos.div_ceil(8) != octets {
            return Err(UperError::TrailingBits {
                bit_offset: self.bit_pos,
                octets,
            });
        }
        if self.bit_pos % 8 != 0 {
            let last = self.payload[octets - 1];
            let pad_mask = 0xFFu8 >> (self.bit_pos % 8);
            if last & pad_mask != 0 {
                return Err(UperError::TrailingBits {
                    bit_offset: self.bit_pos,
                    octets,
                });
            }
        }
        Ok(())
    }
}
