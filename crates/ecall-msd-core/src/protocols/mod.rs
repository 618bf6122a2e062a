//! Wire-format modules.
//!
//! Each format follows a layered structure:
//! - `layout`: field widths, tags and offsets (source of truth)
//! - `reader`/`writer`: checked bit or byte access
//! - `parser`/`encoder`: domain-level decoding and encoding
//! - `error`: explicit, actionable errors
//!
//! Everything here is pure and performs no I/O; shape selection lives in
//! `resolve`.

pub mod envelope;
pub mod uper;
