use super::error::UperError;

/// MSB-first bit sink. Bits are packed back to back; the only padding is the
/// zero fill of the last octet, added when the sink is flushed.
#[derive(Debug, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bits(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            bit_len: 0,
        }
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn write_bool(&mut self, value: bool) {
        self.push_bit(value);
    }

    /// Appends `value` as an unsigned field of `width` bits.
    pub fn write_uint(&mut self, width: u32, value: u64) -> Result<(), UperError> {
        if width < u64::BITS && value >> width != 0 {
            return Err(UperError::ValueTooWide {
                value: value as i64,
                width,
            });
        }
        for shift in (0..width).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
        Ok(())
    }

    /// Appends `value` as a two's-complement field of `width` bits.
    pub fn write_int(&mut self, width: u32, value: i64) -> Result<(), UperError> {
        if width == 0 || width > i64::BITS {
            return Err(UperError::ValueTooWide { value, width });
        }
        if width < i64::BITS {
            let min = -(1i64 << (width - 1));
            let max = (1i64 << (width - 1)) - 1;
            if value < min || value > max {
                return Err(UperError::ValueTooWide { value, width });
            }
        }
        let mask = if width == u64::BITS {
            u64::MAX
        } else {
            (1u64 << width) - 1
        };
        self.write_uint(width, value as u64 & mask)
    }

    /// Returns the packed octets; unused bits of the last octet are zero.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    fn push_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }
}
