use super::error::UperError;
use super::layout;
use super::reader::BitReader;
use crate::msd::{
    ControlType, LocationDelta, MsdRecord, PropulsionStorage, VIN_LEN, VehicleLocation,
};
use crate::validate::{self, ValidationError};

/// Decodes one complete UPER-encoded MSD structure.
///
/// The whole payload must be consumed: after the last field only zero
/// padding up to the octet boundary may remain. Range violations are
/// decode failures, never clamped.
pub fn parse_msd(payload: &[u8]) -> Result<MsdRecord, UperError> {
    let mut reader = BitReader::new(payload);
    reader.require_bits(layout::MESSAGE_IDENTIFIER_BITS)?;

    let message_identifier = reader.read_uint(layout::MESSAGE_IDENTIFIER_BITS)? as u8;
    let control = read_control(&mut reader)?;
    let vin = read_vin(&mut reader)?;
    let propulsion = read_propulsion(&mut reader)?;
    let timestamp = reader.read_uint(layout::TIMESTAMP_BITS)? as u32;
    let location = VehicleLocation {
        latitude: reader.read_int(layout::POSITION_BITS)? as i32,
        longitude: reader.read_int(layout::POSITION_BITS)? as i32,
    };

    let direction_offset = reader.position();
    let vehicle_direction = reader.read_uint(layout::DIRECTION_BITS)? as u8;
    check(direction_offset, validate::validate_direction(vehicle_direction))?;

    let recent_location_n1 = read_delta(&mut reader)?;
    let recent_location_n2 = read_delta(&mut reader)?;
    let number_of_occupants = read_occupants(&mut reader)?;
    reader.finish()?;

    Ok(MsdRecord {
        message_identifier,
        control,
        vin,
        propulsion,
        timestamp,
        location,
        vehicle_direction,
        recent_location_n1,
        recent_location_n2,
        number_of_occupants,
    })
}

fn read_control(reader: &mut BitReader<'_>) -> Result<ControlType, UperError> {
    let automatic_activation = reader.read_bool()?;
    let test_call = reader.read_bool()?;
    let position_can_be_trusted = reader.read_bool()?;

    let offset = reader.position();
    let vehicle_type = reader.read_uint(layout::VEHICLE_TYPE_BITS)? as u32 + 1;
    check(offset, validate::validate_vehicle_type(vehicle_type))?;

    Ok(ControlType {
        automatic_activation,
        test_call,
        position_can_be_trusted,
        vehicle_type: vehicle_type as u8,
    })
}

fn read_vin(reader: &mut BitReader<'_>) -> Result<String, UperError> {
    let mut vin = String::with_capacity(VIN_LEN);
    for group in layout::VIN_GROUPS {
        for _ in 0..group {
            let bit_offset = reader.position();
            let index = reader.read_uint(layout::VIN_CHAR_BITS)?;
            let ch = layout::vin_char(index)
                .ok_or(UperError::AlphabetIndex { bit_offset, index })?;
            vin.push(ch);
        }
    }
    Ok(vin)
}

fn read_propulsion(reader: &mut BitReader<'_>) -> Result<PropulsionStorage, UperError> {
    let mut flags = [false; layout::PROPULSION_FLAGS];
    for flag in flags.iter_mut() {
        *flag = reader.read_bool()?;
    }
    Ok(PropulsionStorage::from_flags(flags))
}

fn read_delta(reader: &mut BitReader<'_>) -> Result<LocationDelta, UperError> {
    Ok(LocationDelta {
        latitude_delta: reader.read_int(layout::DELTA_BITS)? as i16,
        longitude_delta: reader.read_int(layout::DELTA_BITS)? as i16,
    })
}

fn read_occupants(reader: &mut BitReader<'_>) -> Result<Option<u8>, UperError> {
    if !reader.read_bool()? {
        return Ok(None);
    }
    let offset = reader.position();
    let count = reader.read_uint(layout::OCCUPANTS_BITS)? as u8;
    check(offset, validate::validate_occupants(Some(count)))?;
    Ok(Some(count))
}

fn check(bit_offset: usize, result: Result<(), ValidationError>) -> Result<(), UperError> {
    result.map_err(|source| UperError::Constraint { bit_offset, source })
}
