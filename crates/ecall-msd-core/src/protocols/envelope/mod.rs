//! Envelope framing around an encoded MSD.
//!
//! Two framings are understood: the UPER envelope (one version octet, then
//! the MSD to the end of the buffer) and the legacy BER envelope (a definite
//! length `SEQUENCE` of version INTEGER and MSD OCTET STRING). Neither
//! interprets the MSD bytes.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use error::EnvelopeError;
pub use parser::{Envelope, parse_ber_envelope, parse_uper_envelope};
pub use writer::{write_ber_envelope, write_uper_envelope};
