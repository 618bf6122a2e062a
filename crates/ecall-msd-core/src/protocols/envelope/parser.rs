use super::error::EnvelopeError;
use super::layout;
use super::reader::BerReader;

/// Outer message: a version tag plus the opaque, UPER-encoded MSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Envelope<'a> {
    pub msd_version: u8,
    pub msd: &'a [u8],
}

/// Version octet followed by the MSD, which runs to the end of the buffer.
pub fn parse_uper_envelope(payload: &[u8]) -> Result<Envelope<'_>, EnvelopeError> {
    if payload.len() < layout::UPER_MIN_LEN {
        return Err(EnvelopeError::TooShort {
            needed: layout::UPER_MIN_LEN,
            actual: payload.len(),
        });
    }
    Ok(Envelope {
        msd_version: payload[layout::UPER_VERSION_OFFSET],
        msd: &payload[layout::UPER_MSD_OFFSET..],
    })
}

/// BER `SEQUENCE` holding the version INTEGER and the MSD OCTET STRING.
pub fn parse_ber_envelope(payload: &[u8]) -> Result<Envelope<'_>, EnvelopeError> {
    let mut outer = BerReader::new(payload);
    let content = outer.read_element(&[layout::SEQUENCE_TAG], "SEQUENCE")?;
    outer.finish()?;

    let mut reader = BerReader::new(content);
    let version = reader.read_element(layout::VERSION_TAGS, "msdVersion INTEGER")?;
    let msd_version = version_from_integer(version)?;
    let msd = reader.read_element(layout::MSD_TAGS, "msd OCTET STRING")?;
    reader.finish().map_err(|err| match err {
        EnvelopeError::TrailingData { offset, remaining } => EnvelopeError::TrailingData {
            offset: offset + (payload.len() - content.len()),
            remaining,
        },
        other => other,
    })?;
    if msd.is_empty() {
        return Err(EnvelopeError::EmptyPayload);
    }

    Ok(Envelope { msd_version, msd })
}

fn version_from_integer(content: &[u8]) -> Result<u8, EnvelopeError> {
    match content {
        [value] if *value < 0x80 => Ok(*value),
        [0x00, value] => Ok(*value),
        _ => Err(EnvelopeError::InvalidVersion {
            octets: content.len(),
        }),
    }
}
