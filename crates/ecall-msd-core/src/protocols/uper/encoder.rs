use thiserror::Error;

use super::error::UperError;
use super::layout;
use super::writer::BitWriter;
use crate::msd::{LocationDelta, MsdRecord};
use crate::validate::{self, ValidationError};

/// Errors returned when encoding an MSD.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    #[error("invalid MSD: {0}")]
    Validation(#[from] ValidationError),
    #[error("packing failed: {0}")]
    Packing(#[from] UperError),
}

/// Encodes one MSD structure as UPER, after validating every field.
pub fn encode_msd(record: &MsdRecord) -> Result<Vec<u8>, EncodeError> {
    validate::validate_record(record)?;

    let mut writer = BitWriter::with_capacity_bits(layout::MSD_MAX_BITS);
    writer.write_uint(
        layout::MESSAGE_IDENTIFIER_BITS,
        u64::from(record.message_identifier),
    )?;

    writer.write_bool(record.control.automatic_activation);
    writer.write_bool(record.control.test_call);
    writer.write_bool(record.control.position_can_be_trusted);
    writer.write_uint(
        layout::VEHICLE_TYPE_BITS,
        u64::from(record.control.vehicle_type - 1),
    )?;

    write_vin(&mut writer, &record.vin)?;

    for flag in record.propulsion.flags() {
        writer.write_bool(flag);
    }

    writer.write_uint(layout::TIMESTAMP_BITS, u64::from(record.timestamp))?;
    writer.write_int(layout::POSITION_BITS, i64::from(record.location.latitude))?;
    writer.write_int(layout::POSITION_BITS, i64::from(record.location.longitude))?;
    writer.write_uint(layout::DIRECTION_BITS, u64::from(record.vehicle_direction))?;

    write_delta(&mut writer, &record.recent_location_n1)?;
    write_delta(&mut writer, &record.recent_location_n2)?;

    writer.write_bool(record.number_of_occupants.is_some());
    if let Some(count) = record.number_of_occupants {
        writer.write_uint(layout::OCCUPANTS_BITS, u64::from(count))?;
    }

    Ok(writer.into_bytes())
}

fn write_vin(writer: &mut BitWriter, vin: &str) -> Result<(), EncodeError> {
    let mut chars = vin.chars().enumerate();
    for group in layout::VIN_GROUPS {
        for (index, ch) in chars.by_ref().take(group) {
            let code = layout::vin_char_index(ch)
                .ok_or(ValidationError::VinCharacter { ch, index })?;
            writer.write_uint(layout::VIN_CHAR_BITS, u64::from(code))?;
        }
    }
    Ok(())
}

fn write_delta(writer: &mut BitWriter, delta: &LocationDelta) -> Result<(), UperError> {
    writer.write_int(layout::DELTA_BITS, i64::from(delta.latitude_delta))?;
    writer.write_int(layout::DELTA_BITS, i64::from(delta.longitude_delta))
}

#[cfg(test)]
mod tests {
    use super::{EncodeError, encode_msd};
    use crate::msd::{LocationDelta, MsdRecord, PropulsionStorage};
    use crate::protocols::uper::layout;
    use crate::protocols::uper::parser::parse_msd;
    use crate::validate::ValidationError;

    #[test]
    fn encode_sample_message() {
        let bytes = encode_msd(&MsdRecord::sample()).unwrap();
        assert_eq!(bytes.len(), layout::octets_for_bits(layout::MSD_MAX_BITS));
        assert_eq!(&bytes[..4], &[0x01, 0xA0, 0x74, 0xB2]);
        assert_eq!(&bytes[36..], &[0x04, 0x04]);
    }

    #[test]
    fn missing_occupants_drop_one_octet() {
        let record = MsdRecord {
            number_of_occupants: None,
            ..MsdRecord::sample()
        };
        let bytes = encode_msd(&record).unwrap();
        assert_eq!(bytes.len(), layout::octets_for_bits(layout::MSD_MIN_BITS));
        assert_eq!(parse_msd(&bytes).unwrap(), record);
    }

    #[test]
    fn sentinels_round_trip() {
        let record = MsdRecord {
            vehicle_direction: 255,
            recent_location_n1: LocationDelta::ABSENT,
            recent_location_n2: LocationDelta {
                latitude_delta: i16::MIN,
                longitude_delta: i16::MAX,
            },
            number_of_occupants: Some(0),
            propulsion: PropulsionStorage::default(),
            ..MsdRecord::sample()
        };
        let bytes = encode_msd(&record).unwrap();
        assert_eq!(parse_msd(&bytes).unwrap(), record);
    }

    #[test]
    fn encode_rejects_lowercase_vin() {
        let record = MsdRecord {
            vin: "WBA1234567890ABCi".to_string(),
            ..MsdRecord::sample()
        };
        let err = encode_msd(&record).unwrap_err();
        assert_eq!(
            err,
            EncodeError::Validation(ValidationError::VinCharacter { ch: 'i', index: 16 })
        );
    }

    #[test]
    fn encode_rejects_out_of_range_fields() {
        let mut record = MsdRecord::sample();
        record.control.vehicle_type = 24;
        assert!(matches!(
            encode_msd(&record),
            Err(EncodeError::Validation(ValidationError::VehicleType { value: 24 }))
        ));

        let record = MsdRecord {
            vehicle_direction: 180,
            ..MsdRecord::sample()
        };
        assert!(matches!(
            encode_msd(&record),
            Err(EncodeError::Validation(ValidationError::Direction { value: 180 }))
        ));

        let record = MsdRecord {
            number_of_occupants: Some(255),
            ..MsdRecord::sample()
        };
        assert!(matches!(
            encode_msd(&record),
            Err(EncodeError::Validation(ValidationError::OccupantsSentinel))
        ));
    }

    #[test]
    fn encode_carries_full_coordinate_range() {
        let record = MsdRecord {
            location: crate::msd::VehicleLocation {
                latitude: i32::MIN,
                longitude: i32::MAX,
            },
            ..MsdRecord::sample()
        };
        let bytes = encode_msd(&record).unwrap();
        assert_eq!(parse_msd(&bytes).unwrap().location, record.location);
    }
}
