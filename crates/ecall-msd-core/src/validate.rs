//! Field constraints shared by the encoder, the decoder and callers.
//!
//! Callers run `validate_vin` and `validate_coordinates` before encoding and
//! report failures themselves; the encoder re-runs `validate_record` on every
//! call. Coordinate bounds are a caller-side check only: the wire field is a
//! full 32-bit two's-complement integer.

use thiserror::Error;

use crate::msd::{DIRECTION_MAX, DIRECTION_UNKNOWN, MsdRecord, OCCUPANTS_SENTINEL, VIN_LEN};
use crate::protocols::uper::layout;

pub const LATITUDE_LIMIT: i32 = 324_000_000;
pub const LONGITUDE_LIMIT: i32 = 648_000_000;

/// Reasons a record (or a decoded field) is out of its declared range.
///
/// # Examples
/// ```
/// use ecall_msd_core::{ValidationError, validate_vin};
///
/// let err = validate_vin("WBA123").unwrap_err();
/// assert!(matches!(err, ValidationError::VinLength { actual: 6 }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("VIN must be exactly 17 characters, got {actual}")]
    VinLength { actual: usize },
    #[error("VIN character {ch:?} at position {index} is not permitted")]
    VinCharacter { ch: char, index: usize },
    #[error("latitude {value} outside ±324000000 milli-arcseconds")]
    Latitude { value: i32 },
    #[error("longitude {value} outside ±648000000 milli-arcseconds")]
    Longitude { value: i32 },
    #[error("vehicle type {value} outside 1..=23")]
    VehicleType { value: u32 },
    #[error("vehicle direction {value} is neither 0..=179 nor 255")]
    Direction { value: u8 },
    #[error("occupant count 255 is reserved")]
    OccupantsSentinel,
}

pub fn validate_vin(vin: &str) -> Result<(), ValidationError> {
    let count = vin.chars().count();
    if count != VIN_LEN {
        return Err(ValidationError::VinLength { actual: count });
    }
    match vin
        .chars()
        .enumerate()
        .find(|(_, ch)| layout::vin_char_index(*ch).is_none())
    {
        Some((index, ch)) => Err(ValidationError::VinCharacter { ch, index }),
        None => Ok(()),
    }
}

pub fn is_valid_vin(vin: &str) -> bool {
    validate_vin(vin).is_ok()
}

pub fn validate_coordinates(latitude: i32, longitude: i32) -> Result<(), ValidationError> {
    if !(-LATITUDE_LIMIT..=LATITUDE_LIMIT).contains(&latitude) {
        return Err(ValidationError::Latitude { value: latitude });
    }
    if !(-LONGITUDE_LIMIT..=LONGITUDE_LIMIT).contains(&longitude) {
        return Err(ValidationError::Longitude { value: longitude });
    }
    Ok(())
}

pub fn validate_vehicle_type(value: u32) -> Result<(), ValidationError> {
    if value == 0 || value > layout::VEHICLE_TYPE_COUNT {
        return Err(ValidationError::VehicleType { value });
    }
    Ok(())
}

pub fn validate_direction(value: u8) -> Result<(), ValidationError> {
    if value > DIRECTION_MAX && value != DIRECTION_UNKNOWN {
        return Err(ValidationError::Direction { value });
    }
    Ok(())
}

pub fn validate_occupants(value: Option<u8>) -> Result<(), ValidationError> {
    match value {
        Some(OCCUPANTS_SENTINEL) => Err(ValidationError::OccupantsSentinel),
        _ => Ok(()),
    }
}

/// Checks every constraint the encoder enforces.
pub fn validate_record(record: &MsdRecord) -> Result<(), ValidationError> {
    validate_vin(&record.vin)?;
    validate_vehicle_type(u32::from(record.control.vehicle_type))?;
    validate_direction(record.vehicle_direction)?;
    validate_occupants(record.number_of_occupants)
}
