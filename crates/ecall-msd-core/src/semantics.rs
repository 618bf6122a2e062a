//! Mapping of wire codes to display vocabulary.
//!
//! All functions are total: codes outside the schema map to an explicit
//! unknown value instead of failing.

use time::OffsetDateTime;
use time::macros::format_description;

use crate::msd::{DIRECTION_MAX, PropulsionStorage};

pub const UNKNOWN_VEHICLE_TYPE: &str = "unknown";

/// Category names for vehicle type codes 1..=23, indexed by `code - 1`.
pub static VEHICLE_TYPE_NAMES: [&str; 23] = [
    "passengerVehicleCategoryM1",
    "busesAndCoachesCategoryM2",
    "busesAndCoachesCategoryM3",
    "lightCommercialVehiclesN1",
    "heavyDutyVehiclesCategoryN2",
    "heavyDutyVehiclesCategoryN3",
    "motorcyclesCategoryL1e",
    "motorcyclesCategoryL2e",
    "motorcyclesCategoryL3e",
    "motorcyclesCategoryL4e",
    "motorcyclesCategoryL5e",
    "motorcyclesCategoryL6e",
    "motorcyclesCategoryL7e",
    "trailersCategoryO",
    "agriVehiclesCategoryR",
    "agriVehiclesCategoryS",
    "agriVehiclesCategoryT",
    "offRoadVehiclesCategoryG",
    "specialPurposeMotorCaravanCategorySA",
    "specialPurposeArmouredVehicleCategorySB",
    "specialPurposeAmbulanceCategorySC",
    "specialPurposeHearseCategorySD",
    "otherVehicleCategory",
];

/// Propulsion storage names in wire order.
pub static PROPULSION_NAMES: [&str; 7] = [
    "gasolineTankPresent",
    "dieselTankPresent",
    "compressedNaturalGas",
    "liquidPropaneGas",
    "electricEnergyStorage",
    "hydrogenStorage",
    "otherStorage",
];

/// # Examples
/// ```
/// use ecall_msd_core::vehicle_type_name;
///
/// assert_eq!(vehicle_type_name(1), "passengerVehicleCategoryM1");
/// assert_eq!(vehicle_type_name(999), "unknown");
/// ```
pub fn vehicle_type_name(code: u32) -> &'static str {
    code.checked_sub(1)
        .and_then(|idx| VEHICLE_TYPE_NAMES.get(idx as usize))
        .copied()
        .unwrap_or(UNKNOWN_VEHICLE_TYPE)
}

/// Direction of travel in degrees, `None` when unknown.
///
/// Codes 0..=179 are 2-degree steps; the 255 sentinel and any other code
/// are unknown.
pub fn direction_to_degrees(code: u8) -> Option<f64> {
    (code <= DIRECTION_MAX).then(|| f64::from(code) * 2.0)
}

/// Renders Unix seconds as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(unix_seconds: u32) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    OffsetDateTime::from_unix_timestamp(i64::from(unix_seconds))
        .ok()
        .and_then(|ts| ts.format(format).ok())
        .unwrap_or_else(|| format!("{unix_seconds} (unrepresentable)"))
}

pub fn propulsion_names(storage: &PropulsionStorage) -> Vec<&'static str> {
    storage
        .flags()
        .into_iter()
        .zip(PROPULSION_NAMES)
        .filter_map(|(present, name)| present.then_some(name))
        .collect()
}
