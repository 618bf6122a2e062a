use super::layout;
use super::parser::Envelope;

pub fn write_uper_envelope(envelope: &Envelope<'_>) -> Vec<u8> {
    let mut out = Vec::with_capacity(layout::UPER_MSD_OFFSET + envelope.msd.len());
    out.push(envelope.msd_version);
    out.extend_from_slice(envelope.msd);
    out
}

/// Writes the envelope with context tags `[0]`/`[1]` and minimal lengths.
pub fn write_ber_envelope(envelope: &Envelope<'_>) -> Vec<u8> {
    // INTEGER content is two's complement; values >= 0x80 need a zero octet.
    let version_octets = [0x00, envelope.msd_version];
    let version = if envelope.msd_version < 0x80 {
        &version_octets[1..]
    } else {
        &version_octets[..]
    };

    let mut content = Vec::with_capacity(envelope.msd.len() + 8);
    push_element(&mut content, layout::VERSION_TAG, version);
    push_element(&mut content, layout::MSD_TAG, envelope.msd);

    let mut out = Vec::with_capacity(content.len() + 6);
    push_element(&mut out, layout::SEQUENCE_TAG, &content);
    out
}

fn push_element(out: &mut Vec<u8>, tag: u8, value: &[u8]) {
    out.push(tag);
    push_length(out, value.len());
    out.extend_from_slice(value);
}

fn push_length(out: &mut Vec<u8>, len: usize) {
    if len < usize::from(layout::LONG_FORM_FLAG) {
        out.push(len as u8);
        return;
    }
    let bytes = len.to_be_bytes();
    let skip = bytes.iter().take_while(|&&b| b == 0).count();
    let significant = &bytes[skip..];
    out.push(layout::LONG_FORM_FLAG | significant.len() as u8);
    out.extend_from_slice(significant);
}

#[cfg(test)]
mod tests {
    use super::{write_ber_envelope, write_uper_envelope};
    use crate::protocols::envelope::parser::{Envelope, parse_ber_envelope};

    #[test]
    fn uper_envelope_prefixes_version() {
        let env = Envelope {
            msd_version: 3,
            msd: &[0xAA, 0xBB],
        };
        assert_eq!(write_uper_envelope(&env), vec![0x03, 0xAA, 0xBB]);
    }

    #[test]
    fn ber_envelope_short_form() {
        let env = Envelope {
            msd_version: 3,
            msd: &[0xAA, 0xBB],
        };
        assert_eq!(
            write_ber_envelope(&env),
            vec![0x30, 0x07, 0x80, 0x01, 0x03, 0x81, 0x02, 0xAA, 0xBB]
        );
    }

    #[test]
    fn ber_envelope_high_version_and_long_length() {
        let msd = vec![0x55u8; 200];
        let env = Envelope {
            msd_version: 200,
            msd: &msd,
        };
        let bytes = write_ber_envelope(&env);
        assert_eq!(&bytes[..3], &[0x30, 0x81, 0xCF]);
        assert_eq!(&bytes[3..10], &[0x80, 0x02, 0x00, 0xC8, 0x81, 0x81, 0xC8]);
        assert_eq!(parse_ber_envelope(&bytes).unwrap(), env);
    }
}
