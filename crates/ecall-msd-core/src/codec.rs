//! Encoding entry points for each wire shape.

use crate::msd::{MSD_VERSION, MsdRecord};
use crate::protocols::envelope::{self, Envelope};
use crate::protocols::uper::{EncodeError, encode_msd};
use crate::resolve::WireShape;

/// Encodes `record` in the raw UPER shape, the shape `decode` tries first.
///
/// # Examples
/// ```
/// use ecall_msd_core::{MsdRecord, encode};
///
/// let bytes = encode(&MsdRecord::sample())?;
/// assert_eq!(bytes.len(), 38);
/// # Ok::<(), ecall_msd_core::EncodeError>(())
/// ```
pub fn encode(record: &MsdRecord) -> Result<Vec<u8>, EncodeError> {
    encode_msd(record)
}

/// Encodes `record` in `shape`; envelopes carry `MSD_VERSION`.
pub fn encode_as(record: &MsdRecord, shape: WireShape) -> Result<Vec<u8>, EncodeError> {
    encode_with_version(record, shape, MSD_VERSION)
}

/// Like `encode_as`, with an explicit envelope version (ignored for the
/// raw shape).
pub fn encode_with_version(
    record: &MsdRecord,
    shape: WireShape,
    msd_version: u8,
) -> Result<Vec<u8>, EncodeError> {
    let msd = encode_msd(record)?;
    let outer = Envelope {
        msd_version,
        msd: &msd,
    };
    let bytes = match shape {
        WireShape::RawUper => outer.msd.to_vec(),
        WireShape::EnvelopeUper => envelope::write_uper_envelope(&outer),
        WireShape::EnvelopeBer => envelope::write_ber_envelope(&outer),
    };
    Ok(bytes)
}
