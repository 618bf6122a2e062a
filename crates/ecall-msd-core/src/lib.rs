//! eCall MSD codec: bit-exact UPER encoding of the Minimum Set of Data.
//!
//! The crate turns an [`MsdRecord`] into the packed bit layout a vehicle
//! emits after a crash and back. Decoding accepts three compatible wire
//! shapes (raw UPER, a version-prefixed UPER envelope and a legacy BER
//! envelope) and resolves them in a fixed priority order. Field semantics
//! (vehicle category names, direction in degrees, UTC timestamps) are total
//! functions over the decoded codes.
//!
//! Layering follows the usual decoder split: `protocols` holds the wire
//! formats (layout/reader/parser and their writer/encoder counterparts),
//! `resolve` picks the shape, and the crate root builds a serialisable
//! [`MsdReport`] for the CLI. Nothing here performs I/O.
//!
//! Invariants:
//! - `decode(encode(r)) == r` for every record that passes validation.
//! - A decode either returns a fully validated record or an error; field
//!   values are never clamped or defaulted.
//! - The raw shape wins whenever it validates; later shapes are not tried.
//!
//! # Examples
//! ```
//! use ecall_msd_core::{MsdRecord, decode, encode, vehicle_type_name};
//!
//! let record = MsdRecord::sample();
//! let bytes = encode(&record)?;
//! let decoded = decode(&bytes)?;
//! assert_eq!(decoded, record);
//! assert_eq!(
//!     vehicle_type_name(u32::from(decoded.control.vehicle_type)),
//!     "passengerVehicleCategoryM1"
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use serde::{Deserialize, Serialize};

mod codec;
mod hexdump;
mod msd;
pub mod protocols;
mod resolve;
mod semantics;
mod validate;

pub use codec::{encode, encode_as, encode_with_version};
pub use hexdump::{HexError, parse_hex, to_hex_spaced};
pub use msd::{
    ControlType, DIRECTION_MAX, DIRECTION_UNKNOWN, LocationDelta, MSD_VERSION, MsdRecord,
    OCCUPANTS_SENTINEL, PropulsionStorage, VIN_LEN, VehicleLocation,
};
pub use protocols::envelope::EnvelopeError;
pub use protocols::uper::{EncodeError, UperError};
pub use resolve::{
    DecodeError, Decoded, ShapeError, ShapeFailure, WireShape, decode, resolve, resolve_with,
};
pub use semantics::{
    UNKNOWN_VEHICLE_TYPE, direction_to_degrees, format_timestamp, propulsion_names,
    vehicle_type_name,
};
pub use validate::{
    LATITUDE_LIMIT, LONGITUDE_LIMIT, ValidationError, is_valid_vin, validate_coordinates,
    validate_direction, validate_occupants, validate_record, validate_vehicle_type, validate_vin,
};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;

/// Decoded MSD plus the display fields derived from it.
///
/// # Examples
/// ```
/// use ecall_msd_core::{MsdRecord, encode, make_report, resolve};
///
/// let bytes = encode(&MsdRecord::sample())?;
/// let report = make_report(&resolve(&bytes)?, &bytes);
/// assert_eq!(report.timestamp_utc, "2024-01-29 08:00:00 UTC");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsdReport {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// Wire shape the payload resolved to.
    pub shape: WireShape,
    /// Envelope version, absent for raw payloads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msd_version: Option<u8>,
    /// Input payload as spaced uppercase hex.
    pub payload_hex: String,
    pub record: MsdRecord,
    pub vehicle_type_name: String,
    /// Direction of travel in degrees; omitted when unknown.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction_degrees: Option<f64>,
    pub timestamp_utc: String,
    /// Declared propulsion storage types in schema order.
    pub propulsion: Vec<String>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl ToolInfo {
    pub fn current() -> Self {
        Self {
            name: "ecall-msd".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Builds the report for a resolved payload.
pub fn make_report(decoded: &Decoded, payload: &[u8]) -> MsdReport {
    let record = &decoded.record;
    MsdReport {
        report_version: REPORT_VERSION,
        tool: ToolInfo::current(),
        shape: decoded.shape,
        msd_version: decoded.msd_version,
        payload_hex: to_hex_spaced(payload),
        record: record.clone(),
        vehicle_type_name: vehicle_type_name(u32::from(record.control.vehicle_type)).to_string(),
        direction_degrees: direction_to_degrees(record.vehicle_direction),
        timestamp_utc: format_timestamp(record.timestamp),
        propulsion: propulsion_names(&record.propulsion)
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}
