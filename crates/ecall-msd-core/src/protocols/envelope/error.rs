use thiserror::Error;

/// Errors returned by envelope framing (UPER or BER).
///
/// # Examples
/// ```
/// use ecall_msd_core::EnvelopeError;
///
/// let err = EnvelopeError::IndefiniteLength { offset: 1 };
/// assert!(err.to_string().contains("indefinite length"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
    #[error("unexpected tag 0x{actual:02X} at byte {offset}, expected {expected}")]
    UnexpectedTag {
        offset: usize,
        expected: &'static str,
        actual: u8,
    },
    #[error("indefinite length at byte {offset} is not supported")]
    IndefiniteLength { offset: usize },
    #[error("length at byte {offset} uses {octets} octets")]
    LengthOverflow { offset: usize, octets: usize },
    #[error("{remaining} unexpected bytes after byte {offset}")]
    TrailingData { offset: usize, remaining: usize },
    #[error("invalid msdVersion encoding: {octets} content octets")]
    InvalidVersion { octets: usize },
    #[error("empty msd payload")]
    EmptyPayload,
}
