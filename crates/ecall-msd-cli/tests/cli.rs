use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

const SAMPLE_HEX: &str = "01 A0 74 B2 81 08 31 05 18 72 09 00 A2 CC 36 03 2D BA D8 00 F8 93 BE 00 13 AA CA 40 00 00 00 00 00 00 00 00 04 04";

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("ecall-msd"))
}

fn repo_root() -> std::path::PathBuf {
    let manifest = std::path::Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest
        .parent()
        .and_then(|p| p.parent())
        .expect("repo root")
        .to_path_buf()
}

fn golden_fixture(name: &str) -> std::path::PathBuf {
    repo_root()
        .join("tests")
        .join("golden")
        .join(name)
        .join("fixture.json")
}

#[test]
fn help_lists_subcommands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("encode").and(contains("decode")).and(contains("validate")));
}

#[test]
fn encode_defaults_to_sample_message() {
    cmd()
        .arg("encode")
        .assert()
        .success()
        .stdout(contains(SAMPLE_HEX));
}

#[test]
fn encode_warns_on_out_of_range_position() {
    cmd()
        .arg("encode")
        .assert()
        .success()
        .stderr(contains("position outside the geographic range"));
}

#[test]
fn encode_rejects_bad_vin_with_hint() {
    cmd()
        .arg("encode")
        .arg("--vin")
        .arg("WBA1234567890ABCi")
        .assert()
        .failure()
        .code(2)
        .stderr(contains("error: invalid VIN").and(contains("hint:")));
}

#[test]
fn encode_rejects_vehicle_type_out_of_range() {
    cmd()
        .arg("encode")
        .arg("--vehicle-type")
        .arg("24")
        .assert()
        .failure()
        .stderr(contains("encoding failed"));
}

#[test]
fn encode_json_reports_shape_and_length() {
    let assert = cmd()
        .arg("encode")
        .arg("--shape")
        .arg("envelope-ber")
        .arg("--json")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["shape"], "envelope-ber");
    assert_eq!(value["msd_version"], 3);
    assert_eq!(value["bytes"], 45);
    assert!(value["hex"].as_str().unwrap().starts_with("30 2B 80 01 03 81 26"));
}

#[test]
fn encode_from_json_input() {
    let temp = TempDir::new().expect("tempdir");
    let fixture: Value = serde_json::from_str(
        &std::fs::read_to_string(golden_fixture("ev_raw")).expect("read fixture"),
    )
    .expect("parse fixture");
    let record_path = temp.path().join("record.json");
    std::fs::write(&record_path, fixture["record"].to_string()).expect("write record");

    let expected = std::fs::read_to_string(
        golden_fixture("ev_raw").with_file_name("expected.hex"),
    )
    .expect("read expected.hex");

    cmd()
        .arg("encode")
        .arg("--input")
        .arg(&record_path)
        .assert()
        .success()
        .stdout(contains(expected.trim()));
}

#[test]
fn encode_rejects_malformed_json_input() {
    let temp = TempDir::new().expect("tempdir");
    let record_path = temp.path().join("broken.json");
    std::fs::write(&record_path, "{\"vin\": 5}").expect("write record");

    cmd()
        .arg("encode")
        .arg("--input")
        .arg(&record_path)
        .assert()
        .failure()
        .stderr(contains("invalid record JSON").and(contains("hint:")));
}

#[test]
fn encode_output_file_decodes_back() {
    let temp = TempDir::new().expect("tempdir");
    let output = temp.path().join("out").join("msd.bin");

    cmd()
        .arg("encode")
        .arg("--no-occupants")
        .arg("--direction")
        .arg("255")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stderr(contains("OK: 37 bytes written"));

    let assert = cmd()
        .arg("decode")
        .arg("--file")
        .arg(&output)
        .arg("--json")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["shape"], "raw-uper");
    assert_eq!(value["record"]["vehicle_direction"], 255);
    assert!(value.get("direction_degrees").is_none());
    assert!(value["record"].get("number_of_occupants").is_none());
}

#[test]
fn decode_hex_prints_report() {
    cmd()
        .arg("decode")
        .arg(SAMPLE_HEX)
        .assert()
        .success()
        .stdout(
            contains("Shape:            raw-uper")
                .and(contains("passengerVehicleCategoryM1"))
                .and(contains("2024-01-29 08:00:00 UTC"))
                .and(contains("WBA1234567890ABCD")),
        );
}

#[test]
fn decode_accepts_split_hex_arguments() {
    let mut command = cmd();
    command.arg("decode");
    for octet in SAMPLE_HEX.split(' ') {
        command.arg(octet);
    }
    command
        .assert()
        .success()
        .stdout(contains("Occupants:        1"));
}

#[test]
fn decode_glob_reads_every_match() {
    let temp = TempDir::new().expect("tempdir");
    for (name, shape) in [("a.bin", "raw-uper"), ("b.bin", "envelope-uper")] {
        cmd()
            .arg("encode")
            .arg("--shape")
            .arg(shape)
            .arg("--quiet")
            .arg("-o")
            .arg(temp.path().join(name))
            .assert()
            .success();
    }

    let pattern = temp.path().join("*.bin");
    cmd()
        .arg("decode")
        .arg("--file")
        .arg(pattern.to_string_lossy().to_string())
        .assert()
        .success()
        .stdout(
            contains("a.bin")
                .and(contains("b.bin"))
                .and(contains("Shape:            envelope-uper")),
        );
}

#[test]
fn decode_failure_names_all_shapes() {
    cmd()
        .arg("decode")
        .arg("FF FF FF FF")
        .assert()
        .failure()
        .code(2)
        .stderr(
            contains("decode failed")
                .and(contains("hint: tried shapes: raw-uper, envelope-uper, envelope-ber")),
        );
}

#[test]
fn decode_restricted_shapes() {
    cmd()
        .arg("decode")
        .arg("--shape")
        .arg("envelope-ber")
        .arg(SAMPLE_HEX)
        .assert()
        .failure()
        .stderr(contains("tried shapes: envelope-ber"));
}

#[test]
fn decode_rejects_bad_hex() {
    cmd()
        .arg("decode")
        .arg("ABC")
        .assert()
        .failure()
        .stderr(contains("invalid hex input").and(contains("hint:")));
}

#[test]
fn decode_missing_file_shows_hint() {
    let temp = TempDir::new().expect("tempdir");
    cmd()
        .arg("decode")
        .arg("--file")
        .arg(temp.path().join("missing.bin"))
        .assert()
        .failure()
        .stderr(contains("input file not found").and(contains("hint:")));
}

#[test]
fn pretty_requires_json() {
    cmd()
        .arg("decode")
        .arg("--pretty")
        .arg(SAMPLE_HEX)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn validate_checks_bounds() {
    cmd()
        .arg("validate")
        .arg("--latitude")
        .arg("324000000")
        .arg("--longitude")
        .arg("-648000000")
        .assert()
        .success()
        .stdout(contains("latitude 324000000: ok"));

    cmd()
        .arg("validate")
        .arg("--latitude")
        .arg("324000001")
        .assert()
        .failure()
        .stderr(contains("latitude 324000001").and(contains("hint:")));
}

#[test]
fn validate_vin_alphabet() {
    cmd()
        .arg("validate")
        .arg("--vin")
        .arg("WBA1234567890ABCD")
        .assert()
        .success();
    cmd()
        .arg("validate")
        .arg("--vin")
        .arg("WBAI234567890ABCD")
        .assert()
        .failure();
}

#[test]
fn validate_needs_a_check() {
    cmd().arg("validate").assert().failure();
}

#[test]
fn verbose_logs_resolver_attempts() {
    cmd()
        .arg("--verbose")
        .arg("decode")
        .arg(format!("03 {}", SAMPLE_HEX))
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(contains("shape rejected").and(contains("MSD decoded")));
}
