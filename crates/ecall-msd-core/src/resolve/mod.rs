//! Wire-shape resolution for buffers of unknown provenance.
//!
//! A buffer is tried against each `WireShape` in `WireShape::PRIORITY`
//! order; the first shape whose structure and field ranges both validate
//! wins and no later shape is consulted. When every shape fails, the error
//! lists each attempt with its own reason, without ranking them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::msd::{MSD_VERSION, MsdRecord};
use crate::protocols::envelope::{self, Envelope};
use crate::protocols::uper;

mod error;

pub use error::{DecodeError, ShapeError, ShapeFailure};

/// Compatible framings of an encoded MSD.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WireShape {
    /// The bare UPER MSD structure.
    RawUper,
    /// Version octet followed by the UPER MSD.
    EnvelopeUper,
    /// BER `SEQUENCE` framing around the UPER MSD.
    EnvelopeBer,
}

impl WireShape {
    /// Order in which `resolve` tries shapes.
    pub const PRIORITY: [WireShape; 3] = [
        WireShape::RawUper,
        WireShape::EnvelopeUper,
        WireShape::EnvelopeBer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WireShape::RawUper => "raw-uper",
            WireShape::EnvelopeUper => "envelope-uper",
            WireShape::EnvelopeBer => "envelope-ber",
        }
    }

    /// Decodes `payload` under this shape only.
    pub fn decode(self, payload: &[u8]) -> Result<Decoded, ShapeError> {
        let outer = match self {
            WireShape::RawUper => {
                return Ok(Decoded {
                    record: uper::parse_msd(payload)?,
                    shape: self,
                    msd_version: None,
                });
            }
            WireShape::EnvelopeUper => envelope::parse_uper_envelope(payload)?,
            WireShape::EnvelopeBer => envelope::parse_ber_envelope(payload)?,
        };
        self.decode_inner(outer)
    }

    fn decode_inner(self, outer: Envelope<'_>) -> Result<Decoded, ShapeError> {
        let record = uper::parse_msd(outer.msd)?;
        Ok(Decoded {
            record,
            shape: self,
            msd_version: Some(outer.msd_version),
        })
    }
}

impl fmt::Display for WireShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WireShape {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        WireShape::PRIORITY
            .into_iter()
            .find(|shape| shape.name() == value)
            .ok_or_else(|| {
                format!(
                    "unknown wire shape '{value}' (expected raw-uper, envelope-uper or envelope-ber)"
                )
            })
    }
}

/// A validated record together with the framing it arrived in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub record: MsdRecord,
    pub shape: WireShape,
    /// Envelope version; `None` for the raw shape.
    pub msd_version: Option<u8>,
}

/// Decodes `payload` trying every shape in priority order.
pub fn resolve(payload: &[u8]) -> Result<Decoded, DecodeError> {
    resolve_with(payload, &WireShape::PRIORITY)
}

/// Decodes `payload` trying only `shapes`, in the given order.
pub fn resolve_with(payload: &[u8], shapes: &[WireShape]) -> Result<Decoded, DecodeError> {
    let mut attempts = Vec::with_capacity(shapes.len());
    for &shape in shapes {
        match shape.decode(payload) {
            Ok(decoded) => {
                debug!(shape = %shape, len = payload.len(), "MSD decoded");
                if let Some(version) = decoded.msd_version {
                    if version != MSD_VERSION {
                        warn!(
                            shape = %shape,
                            version,
                            expected = MSD_VERSION,
                            "msdVersion differs from schema version; decoding anyway"
                        );
                    }
                }
                return Ok(decoded);
            }
            Err(error) => {
                debug!(shape = %shape, %error, "shape rejected");
                attempts.push(ShapeFailure { shape, error });
            }
        }
    }
    Err(DecodeError { attempts })
}

/// Decodes `payload` and returns only the record.
///
/// # Examples
/// ```
/// use ecall_msd_core::{MsdRecord, decode, encode};
///
/// let bytes = encode(&MsdRecord::sample())?;
/// assert_eq!(decode(&bytes)?, MsdRecord::sample());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decode(payload: &[u8]) -> Result<MsdRecord, DecodeError> {
    resolve(payload).map(|decoded| decoded.record)
}
