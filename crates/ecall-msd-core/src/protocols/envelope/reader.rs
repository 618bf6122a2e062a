use super::error::EnvelopeError;
use super::layout;

/// Cursor over definite-length BER TLV elements.
pub struct BerReader<'a> {
    payload: &'a [u8],
    position: usize,
}

impl<'a> BerReader<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        Self {
            payload,
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.payload.len().saturating_sub(self.position)
    }

    pub fn read_u8(&mut self) -> Result<u8, EnvelopeError> {
        let value = self
            .payload
            .get(self.position)
            .copied()
            .ok_or(EnvelopeError::TooShort {
                needed: self.position + 1,
                actual: self.payload.len(),
            })?;
        self.position += 1;
        Ok(value)
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8], EnvelopeError> {
        let end = self
            .position
            .checked_add(len)
            .ok_or(EnvelopeError::TooShort {
                needed: usize::MAX,
                actual: self.payload.len(),
            })?;
        let slice = self
            .payload
            .get(self.position..end)
            .ok_or(EnvelopeError::TooShort {
                needed: end,
                actual: self.payload.len(),
            })?;
        self.position = end;
        Ok(slice)
    }

    /// Reads a definite length in short or long form.
    pub fn read_length(&mut self) -> Result<usize, EnvelopeError> {
        let offset = self.position;
        let first = self.read_u8()?;
        if first & layout::LONG_FORM_FLAG == 0 {
            return Ok(usize::from(first));
        }
        if first == layout::INDEFINITE_LENGTH {
            return Err(EnvelopeError::IndefiniteLength { offset });
        }
        let octets = usize::from(first & !layout::LONG_FORM_FLAG);
        if octets > layout::MAX_LENGTH_OCTETS {
            return Err(EnvelopeError::LengthOverflow { offset, octets });
        }
        let bytes = self.read_slice(octets)?;
        Ok(bytes
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b)))
    }

    /// Reads one element whose tag is in `tags` and returns its contents.
    pub fn read_element(
        &mut self,
        tags: &[u8],
        expected: &'static str,
    ) -> Result<&'a [u8], EnvelopeError> {
        let offset = self.position;
        let tag = self.read_u8()?;
        if !tags.contains(&tag) {
            return Err(EnvelopeError::UnexpectedTag {
                offset,
                expected,
                actual: tag,
            });
        }
        let len = self.read_length()?;
        self.read_slice(len)
    }

    /// Fails if any bytes remain after the last element.
    pub fn finish(&self) -> Result<(), EnvelopeError> {
        if self.remaining() != 0 {
            return Err(EnvelopeError::TrailingData {
                offset: self.position,
                remaining: self.remaining(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::BerReader;
    use crate::protocols::envelope::error::EnvelopeError;

    #[test]
    fn short_and_long_form_lengths() {
        let payload = [0x05, 0x81, 0xC8, 0x82, 0x01, 0x00];
        let mut reader = BerReader::new(&payload);
        assert_eq!(reader.read_length().unwrap(), 5);
        assert_eq!(reader.read_length().unwrap(), 200);
        assert_eq!(reader.read_length().unwrap(), 256);
        assert!(reader.finish().is_ok());
    }

    #[test]
    fn indefinite_length_rejected() {
        let payload = [0x30, 0x80];
        let mut reader = BerReader::new(&payload);
        let err = reader.read_element(&[0x30], "SEQUENCE").unwrap_err();
        assert_eq!(err, EnvelopeError::IndefiniteLength { offset: 1 });
    }

    #[test]
    fn oversized_length_rejected() {
        let payload = [0x85, 0, 0, 0, 0, 1];
        let mut reader = BerReader::new(&payload);
        assert!(matches!(
            reader.read_length(),
            Err(EnvelopeError::LengthOverflow { octets: 5, .. })
        ));
    }

    #[test]
    fn element_tag_checked() {
        let payload = [0x04, 0x01, 0xAA];
        let mut reader = BerReader::new(&payload);
        let err = reader.read_element(&[0x81], "msd").unwrap_err();
        assert!(err.to_string().contains("unexpected tag 0x04"));

        let mut reader = BerReader::new(&payload);
        assert_eq!(reader.read_element(&[0x81, 0x04], "msd").unwrap(), &[0xAA]);
    }

    #[test]
    fn element_longer_than_payload() {
        let payload = [0x81, 0x05, 0xAA];
        let mut reader = BerReader::new(&payload);
        let err = reader.read_element(&[0x81], "msd").unwrap_err();
        assert_eq!(
            err,
            EnvelopeError::TooShort {
                needed: 7,
                actual: 3
            }
        );
    }
}
