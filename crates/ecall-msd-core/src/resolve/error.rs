use thiserror::Error;

use super::WireShape;
use crate::protocols::envelope::EnvelopeError;
use crate::protocols::uper::UperError;

/// Why a single wire shape did not produce a valid record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeError {
    #[error("envelope: {0}")]
    Envelope(#[from] EnvelopeError),
    #[error("MSD: {0}")]
    Msd(#[from] UperError),
}

impl ShapeError {
    /// Bit offset inside the MSD payload, for structural and range failures.
    pub fn msd_bit_offset(&self) -> Option<usize> {
        match self {
            ShapeError::Msd(err) => err.bit_offset(),
            ShapeError::Envelope(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeFailure {
    pub shape: WireShape,
    pub error: ShapeError,
}

/// Every attempted shape failed; attempts are listed in the order tried.
///
/// # Examples
/// ```
/// use ecall_msd_core::{WireShape, resolve};
///
/// let err = resolve(&[0x00]).unwrap_err();
/// assert_eq!(err.tried_shapes(), WireShape::PRIORITY.to_vec());
/// assert!(err.to_string().contains("envelope-ber"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no wire shape matched: {}", describe_attempts(.attempts))]
pub struct DecodeError {
    pub attempts: Vec<ShapeFailure>,
}

impl DecodeError {
    pub fn tried_shapes(&self) -> Vec<WireShape> {
        self.attempts.iter().map(|attempt| attempt.shape).collect()
    }
}

fn describe_attempts(attempts: &[ShapeFailure]) -> String {
    if attempts.is_empty() {
        return "no shapes attempted".to_string();
    }
    attempts
        .iter()
        .map(|attempt| format!("{}: {}", attempt.shape, attempt.error))
        .collect::<Vec<_>>()
        .join("; ")
}
