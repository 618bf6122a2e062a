//! In-memory Minimum Set of Data record.
//!
//! One `MsdRecord` is one message: it is built fresh by the caller before an
//! encode, or produced fresh by a successful decode. It carries no identity
//! beyond its field values. Sentinels (`DIRECTION_UNKNOWN`, an all-zero
//! `LocationDelta`) are ordinary values here; the codec passes them through
//! untouched in both directions.

use serde::{Deserialize, Serialize};

/// Schema generation carried by the outer envelope.
pub const MSD_VERSION: u8 = 3;
/// `vehicle_direction` value meaning "direction not known".
pub const DIRECTION_UNKNOWN: u8 = 255;
/// Highest valid direction step (2 degrees per step).
pub const DIRECTION_MAX: u8 = 179;
/// Reserved occupant count; rejected on both encode and decode.
pub const OCCUPANTS_SENTINEL: u8 = 255;
/// Number of characters in a VIN.
pub const VIN_LEN: usize = 17;

/// Decoded or pre-encode MSD record.
///
/// # Examples
/// ```
/// use ecall_msd_core::{MsdRecord, PropulsionStorage};
///
/// let record = MsdRecord {
///     number_of_occupants: Some(2),
///     propulsion: PropulsionStorage {
///         electric_energy_storage: true,
///         ..PropulsionStorage::default()
///     },
///     ..MsdRecord::sample()
/// };
/// assert_eq!(record.vin.len(), 17);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsdRecord {
    /// Message sequence number (0..=255).
    pub message_identifier: u8,
    /// Activation and vehicle category flags.
    pub control: ControlType,
    /// 17-character VIN from the restricted alphabet.
    pub vin: String,
    /// Energy storage present in the vehicle.
    #[serde(default)]
    pub propulsion: PropulsionStorage,
    /// Unix seconds (UTC) of the incident.
    pub timestamp: u32,
    /// Current position.
    pub location: VehicleLocation,
    /// Direction of travel in 2-degree steps, or `DIRECTION_UNKNOWN`.
    pub vehicle_direction: u8,
    /// Most recent prior fix, relative to `location`.
    #[serde(default)]
    pub recent_location_n1: LocationDelta,
    /// Second most recent prior fix, relative to `recent_location_n1`.
    #[serde(default)]
    pub recent_location_n2: LocationDelta,
    /// Occupant count; `None` when the sensor does not report it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_occupants: Option<u8>,
}

impl MsdRecord {
    /// Sample message used by the CLI defaults and the docs.
    pub fn sample() -> Self {
        Self {
            message_identifier: 1,
            control: ControlType {
                automatic_activation: true,
                test_call: false,
                position_can_be_trusted: true,
                vehicle_type: 1,
            },
            vin: "WBA1234567890ABCD".to_string(),
            propulsion: PropulsionStorage {
                gasoline_tank_present: true,
                ..PropulsionStorage::default()
            },
            timestamp: 1_706_515_200,
            location: VehicleLocation {
                latitude: 521_304_000,
                longitude: 41_245_000,
            },
            vehicle_direction: 0,
            recent_location_n1: LocationDelta::ABSENT,
            recent_location_n2: LocationDelta::ABSENT,
            number_of_occupants: Some(1),
        }
    }

    pub fn direction_known(&self) -> bool {
        self.vehicle_direction != DIRECTION_UNKNOWN
    }
}

/// Control flags and vehicle category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlType {
    pub automatic_activation: bool,
    pub test_call: bool,
    pub position_can_be_trusted: bool,
    /// Vehicle category code, 1..=23 (see `semantics::vehicle_type_name`).
    pub vehicle_type: u8,
}

/// Propulsion storage flags, in wire order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropulsionStorage {
    pub gasoline_tank_present: bool,
    pub diesel_tank_present: bool,
    pub compressed_natural_gas: bool,
    pub liquid_propane_gas: bool,
    pub electric_energy_storage: bool,
    pub hydrogen_storage: bool,
    pub other_storage: bool,
}

impl PropulsionStorage {
    /// Flags in wire order.
    pub fn flags(&self) -> [bool; 7] {
        [
            self.gasoline_tank_present,
            self.diesel_tank_present,
            self.compressed_natural_gas,
            self.liquid_propane_gas,
            self.electric_energy_storage,
            self.hydrogen_storage,
            self.other_storage,
        ]
    }

    pub fn from_flags(flags: [bool; 7]) -> Self {
        let [
            gasoline_tank_present,
            diesel_tank_present,
            compressed_natural_gas,
            liquid_propane_gas,
            electric_energy_storage,
            hydrogen_storage,
            other_storage,
        ] = flags;
        Self {
            gasoline_tank_present,
            diesel_tank_present,
            compressed_natural_gas,
            liquid_propane_gas,
            electric_energy_storage,
            hydrogen_storage,
            other_storage,
        }
    }
}

/// Position in milli-arcseconds (WGS84).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleLocation {
    pub latitude: i32,
    pub longitude: i32,
}

/// Offset of a prior fix; `(0, 0)` means no prior fix is available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationDelta {
    pub latitude_delta: i16,
    pub longitude_delta: i16,
}

impl LocationDelta {
    pub const ABSENT: LocationDelta = LocationDelta {
        latitude_delta: 0,
        longitude_delta: 0,
    };

    pub fn is_absent(&self) -> bool {
        *self == Self::ABSENT
    }
}
