use std::fs;
use std::path::{Path, PathBuf};

use ecall_msd_core::{
    MSD_VERSION, MsdRecord, WireShape, encode_with_version, format_timestamp, parse_hex, resolve,
    vehicle_type_name,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct Fixture {
    shape: WireShape,
    #[serde(default)]
    msd_version: Option<u8>,
    record: MsdRecord,
}

fn golden_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("tests")
        .join("golden")
        .join(name)
}

fn load_fixture(name: &str) -> (Fixture, Vec<u8>) {
    let dir = golden_dir(name);
    let fixture_json = fs::read_to_string(dir.join("fixture.json")).expect("read fixture.json");
    let fixture: Fixture = serde_json::from_str(&fixture_json).expect("parse fixture");
    let expected_hex = fs::read_to_string(dir.join("expected.hex")).expect("read expected.hex");
    let expected = parse_hex(&expected_hex).expect("parse expected.hex");
    (fixture, expected)
}

fn run_golden(name: &str) -> Fixture {
    let (fixture, expected) = load_fixture(name);
    let version = fixture.msd_version.unwrap_or(MSD_VERSION);

    let encoded =
        encode_with_version(&fixture.record, fixture.shape, version).expect("encode fixture");
    assert_eq!(encoded, expected, "encode mismatch in {name}");

    let decoded = resolve(&expected).expect("resolve expected bytes");
    assert_eq!(decoded.record, fixture.record, "decode mismatch in {name}");
    assert_eq!(decoded.shape, fixture.shape, "shape mismatch in {name}");
    match fixture.shape {
        WireShape::RawUper => assert_eq!(decoded.msd_version, None),
        _ => assert_eq!(decoded.msd_version, Some(version)),
    }
    fixture
}

#[test]
fn golden_sample_raw() {
    let fixture = run_golden("sample_raw");
    let record = &fixture.record;
    assert_eq!(
        vehicle_type_name(u32::from(record.control.vehicle_type)),
        "passengerVehicleCategoryM1"
    );
    assert_eq!(format_timestamp(record.timestamp), "2024-01-29 08:00:00 UTC");
}

#[test]
fn golden_ev_raw() {
    let fixture = run_golden("ev_raw");
    assert_eq!(fixture.record.number_of_occupants, None);
    assert!(!fixture.record.direction_known());
}

#[test]
fn golden_sample_envelope_uper() {
    run_golden("sample_envelope_uper");
}

#[test]
fn golden_sample_envelope_ber() {
    run_golden("sample_envelope_ber");
}

#[test]
fn golden_ev_envelope_ber_v2() {
    let fixture = run_golden("ev_envelope_ber_v2");
    assert_eq!(fixture.msd_version, Some(2));
}

#[test]
fn golden_raw_sizes_match_presence_bit() {
    let (_, with_occupants) = load_fixture("sample_raw");
    let (_, without_occupants) = load_fixture("ev_raw");
    assert_eq!(with_occupants.len(), 38);
    assert_eq!(without_occupants.len(), 37);
}
