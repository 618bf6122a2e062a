use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ecall_msd_core::{MSD_VERSION, MsdRecord, WireShape, encode_with_version, to_hex_spaced};
use serde::Deserialize;

#[derive(Deserialize)]
struct Fixture {
    shape: WireShape,
    #[serde(default)]
    msd_version: Option<u8>,
    record: MsdRecord,
}

fn main() -> ExitCode {
    if let Err(err) = run() {
        eprintln!("error: {}", err);
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn run() -> Result<(), String> {
    let root = PathBuf::from("tests").join("golden");
    let entries =
        fs::read_dir(&root).map_err(|err| format!("failed to read {}: {}", root.display(), err))?;

    for entry in entries {
        let entry = entry.map_err(|err| format!("failed to read entry: {}", err))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let input = path.join("fixture.json");
        if !input.exists() {
            continue;
        }
        let output = path.join("expected.hex");
        regenerate_one(&input, &output)?;
    }

    Ok(())
}

fn regenerate_one(input: &Path, output: &Path) -> Result<(), String> {
    let json = fs::read_to_string(input)
        .map_err(|err| format!("failed to read {}: {}", input.display(), err))?;
    let fixture: Fixture = serde_json::from_str(&json)
        .map_err(|err| format!("invalid fixture {}: {}", input.display(), err))?;
    let bytes = encode_with_version(
        &fixture.record,
        fixture.shape,
        fixture.msd_version.unwrap_or(MSD_VERSION),
    )
    .map_err(|err| format!("encoding failed for {}: {}", input.display(), err))?;
    fs::write(output, format!("{}\n", to_hex_spaced(&bytes)))
        .map_err(|err| format!("failed to write {}: {}", output.display(), err))?;
    Ok(())
}
