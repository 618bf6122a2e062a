use thiserror::Error;

use crate::validate::ValidationError;

/// Errors returned by the UPER bit reader, writer and MSD parser.
///
/// # Examples
/// ```
/// use ecall_msd_core::UperError;
///
/// let err = UperError::Truncated { bit_offset: 8, needed: 32, available: 4 };
/// assert!(err.to_string().contains("truncated"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UperError {
    #[error(
        "input truncated at bit {bit_offset} (byte {}): need {needed} bits, {available} available",
        .bit_offset / 8
    )]
    Truncated {
        bit_offset: usize,
        needed: u32,
        available: usize,
    },
    #[error("unexpected data after bit {bit_offset}: {octets} octets for {bit_offset} bits")]
    TrailingBits { bit_offset: usize, octets: usize },
    #[error("{source} (field at bit {bit_offset})")]
    Constraint {
        bit_offset: usize,
        #[source]
        source: ValidationError,
    },
    #[error("VIN alphabet index {index} out of range at bit {bit_offset}")]
    AlphabetIndex { bit_offset: usize, index: u64 },
    #[error("value {value} does not fit in {width} bits")]
    ValueTooWide { value: i64, width: u32 },
}

impl UperError {
    /// True when the bits decoded but a value broke a declared range.
    pub fn is_constraint(&self) -> bool {
        matches!(
            self,
            UperError::Constraint { .. } | UperError::AlphabetIndex { .. }
        )
    }

    /// Bit position where the deficiency was detected, when known.
    pub fn bit_offset(&self) -> Option<usize> {
        match self {
            UperError::Truncated { bit_offset, .. }
            | UperError::TrailingBits { bit_offset, .. }
            | UperError::Constraint { bit_offset, .. }
            | UperError::AlphabetIndex { bit_offset, .. } => Some(*bit_offset),
            UperError::ValueTooWide { .. } => None,
        }
    }
}
