//! UPER codec for the MSD structure.
//!
//! Fields are bit-packed back to back with no tags and no length prefixes;
//! the width of each field derives from its declared value range. A presence
//! bit precedes the optional occupant count and shifts every later bit.
//!
//! Field widths and the VIN alphabet live in `layout`, the width-checked bit
//! cursor in `reader`/`writer`, and the field order in `parser`/`encoder`.

pub mod encoder;
pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;
pub mod writer;

pub use encoder::{EncodeError, encode_msd};
pub use error::UperError;
pub use parser::parse_msd;
