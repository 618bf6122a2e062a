//! Hex text to bytes and back, for CLI input and reports.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("invalid hex character {ch:?} at position {index}")]
    InvalidCharacter { ch: char, index: usize },
    #[error("hex string has an odd number of digits ({digits})")]
    OddLength { digits: usize },
}

/// Parses hex text, ignoring case and any whitespace between digits.
///
/// # Examples
/// ```
/// use ecall_msd_core::parse_hex;
///
/// assert_eq!(parse_hex("ab CD\nef")?, vec![0xAB, 0xCD, 0xEF]);
/// # Ok::<(), ecall_msd_core::HexError>(())
/// ```
pub fn parse_hex(text: &str) -> Result<Vec<u8>, HexError> {
    let digits: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
    hex::decode(&digits).map_err(|err| match err {
        hex::FromHexError::InvalidHexCharacter { c, index } => {
            HexError::InvalidCharacter { ch: c, index }
        }
        hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
            HexError::OddLength {
                digits: digits.chars().count(),
            }
        }
    })
}

/// Uppercase hex with one space between octets, e.g. `AB CD EF`.
pub fn to_hex_spaced(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
