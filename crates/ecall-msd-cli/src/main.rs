use std::fmt::Write as _;
use std::fs;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ecall_msd_core::{
    LATITUDE_LIMIT, LONGITUDE_LIMIT, LocationDelta, MSD_VERSION, MsdRecord, MsdReport,
    PropulsionStorage, WireShape,
};
use glob::glob;
use serde::Serialize;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("ECALL_MSD_BUILD_COMMIT"),
    " ",
    env!("ECALL_MSD_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "ecall-msd")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Encode, decode and check eCall Minimum Set of Data (MSD) messages.",
    long_about = None,
    after_help = "Examples:\n  ecall-msd encode\n  ecall-msd encode --vin WBA1234567890ABCD --occupants 2 --shape envelope-ber\n  ecall-msd decode 01 A0 74 B2 ...\n  ecall-msd decode --file 'captures/*.bin' --json"
)]
struct Cli {
    /// Log decode attempts (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encode a record (sample message by default) and print its hex.
    Encode(EncodeArgs),
    /// Decode one payload from hex arguments, or each file matched by --file.
    Decode(DecodeArgs),
    /// Check a VIN and/or coordinates without encoding.
    Validate(ValidateArgs),
}

#[derive(clap::Args, Debug)]
struct EncodeArgs {
    /// Base record as JSON; flags below override its fields
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    message_id: Option<u8>,

    /// Mark the call as manually triggered
    #[arg(long)]
    manual: bool,

    #[arg(long)]
    test_call: bool,

    /// Clear the position-can-be-trusted flag
    #[arg(long)]
    untrusted_position: bool,

    /// Vehicle type code (1..=23)
    #[arg(long)]
    vehicle_type: Option<u8>,

    #[arg(long)]
    vin: Option<String>,

    /// Propulsion storage types, comma separated
    #[arg(long, value_enum, value_delimiter = ',')]
    propulsion: Option<Vec<Propulsion>>,

    /// Unix seconds (UTC)
    #[arg(long)]
    timestamp: Option<u32>,

    /// Latitude in milliarcseconds
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<i32>,

    /// Longitude in milliarcseconds
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<i32>,

    /// Direction in 2-degree steps (0..=179), 255 when unknown
    #[arg(long)]
    direction: Option<u8>,

    #[arg(long, conflicts_with = "no_occupants")]
    occupants: Option<u8>,

    /// Omit the occupant count
    #[arg(long)]
    no_occupants: bool,

    /// Wire shape to produce
    #[arg(long, default_value = "raw-uper")]
    shape: WireShape,

    /// Envelope version octet (ignored for raw-uper)
    #[arg(long, default_value_t = MSD_VERSION)]
    msd_version: u8,

    /// Write the encoded bytes to a binary file
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Print a JSON summary instead of plain hex
    #[arg(long)]
    json: bool,

    /// Suppress non-error output
    #[arg(long)]
    quiet: bool,
}

#[derive(clap::Args, Debug)]
struct DecodeArgs {
    /// Hex octets; whitespace between digits is ignored
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    hex: Vec<String>,

    /// Binary payload file or glob pattern (repeatable)
    #[arg(long)]
    file: Vec<String>,

    /// Restrict decoding to these shapes, in the given order
    #[arg(long, value_delimiter = ',')]
    shape: Vec<WireShape>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Pretty-print JSON output
    #[arg(long, requires = "json")]
    pretty: bool,
}

#[derive(clap::Args, Debug)]
#[group(required = true, multiple = true)]
struct ValidateArgs {
    #[arg(long)]
    vin: Option<String>,

    /// Latitude in milliarcseconds
    #[arg(long, allow_hyphen_values = true)]
    latitude: Option<i32>,

    /// Longitude in milliarcseconds
    #[arg(long, allow_hyphen_values = true)]
    longitude: Option<i32>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Propulsion {
    Gasoline,
    Diesel,
    Cng,
    Lpg,
    Electric,
    Hydrogen,
    Other,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Encode(args) => cmd_encode(args),
        Commands::Decode(args) => cmd_decode(args),
        Commands::Validate(args) => cmd_validate(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

#[derive(Serialize)]
struct EncodeSummary<'a> {
    shape: WireShape,
    #[serde(skip_serializing_if = "Option::is_none")]
    msd_version: Option<u8>,
    bytes: usize,
    hex: &'a str,
}

fn cmd_encode(args: EncodeArgs) -> Result<(), CliError> {
    let record = build_record(&args)?;

    ecall_msd_core::validate_vin(&record.vin).map_err(|err| {
        CliError::new(
            format!("invalid VIN '{}': {}", record.vin, err),
            Some("VINs are 17 characters from 0-9 and A-Z without I, O and Q".to_string()),
        )
    })?;
    if let Err(err) =
        ecall_msd_core::validate_coordinates(record.location.latitude, record.location.longitude)
    {
        warn!(%err, "position outside the geographic range; encoding anyway");
    }

    let bytes = ecall_msd_core::encode_with_version(&record, args.shape, args.msd_version)
        .map_err(|err| CliError::new(format!("encoding failed: {}", err), None))?;
    let hex = ecall_msd_core::to_hex_spaced(&bytes);
    info!(shape = %args.shape, len = bytes.len(), "MSD encoded");

    if let Some(path) = args.output.as_ref() {
        write_output(path, &bytes)?;
        if !args.quiet {
            eprintln!("OK: {} bytes written -> {}", bytes.len(), path.display());
        }
    }
    if args.quiet {
        return Ok(());
    }

    if args.json {
        let summary = EncodeSummary {
            shape: args.shape,
            msd_version: (args.shape != WireShape::RawUper).then_some(args.msd_version),
            bytes: bytes.len(),
            hex: &hex,
        };
        let json = serde_json::to_string(&summary).context("JSON serialization failed")?;
        println!("{}", json);
    } else {
        println!("{}", hex);
    }
    Ok(())
}

fn build_record(args: &EncodeArgs) -> Result<MsdRecord, CliError> {
    let mut record = match args.input.as_ref() {
        Some(path) => load_record(path)?,
        None => MsdRecord::sample(),
    };

    if let Some(id) = args.message_id {
        record.message_identifier = id;
    }
    if args.manual {
        record.control.automatic_activation = false;
    }
    if args.test_call {
        record.control.test_call = true;
    }
    if args.untrusted_position {
        record.control.position_can_be_trusted = false;
    }
    if let Some(vehicle_type) = args.vehicle_type {
        record.control.vehicle_type = vehicle_type;
    }
    if let Some(vin) = args.vin.as_ref() {
        record.vin = vin.clone();
    }
    if let Some(kinds) = args.propulsion.as_ref() {
        record.propulsion = propulsion_from(kinds);
    }
    if let Some(timestamp) = args.timestamp {
        record.timestamp = timestamp;
    }
    if let Some(latitude) = args.latitude {
        record.location.latitude = latitude;
    }
    if let Some(longitude) = args.longitude {
        record.location.longitude = longitude;
    }
    if let Some(direction) = args.direction {
        record.vehicle_direction = direction;
    }
    if let Some(occupants) = args.occupants {
        record.number_of_occupants = Some(occupants);
    }
    if args.no_occupants {
        record.number_of_occupants = None;
    }
    Ok(record)
}

fn load_record(path: &Path) -> Result<MsdRecord, CliError> {
    let json = fs::read_to_string(path).map_err(|err| {
        CliError::new(
            format!("failed to read record {}: {}", path.display(), err),
            Some("pass a JSON file with the MSD record fields".to_string()),
        )
    })?;
    serde_json::from_str(&json).map_err(|err| {
        CliError::new(
            format!("invalid record JSON in {}: {}", path.display(), err),
            Some("see `ecall-msd decode --json` output for the expected layout".to_string()),
        )
    })
}

fn propulsion_from(kinds: &[Propulsion]) -> PropulsionStorage {
    let mut storage = PropulsionStorage::default();
    for kind in kinds {
        match kind {
            Propulsion::Gasoline => storage.gasoline_tank_present = true,
            Propulsion::Diesel => storage.diesel_tank_present = true,
            Propulsion::Cng => storage.compressed_natural_gas = true,
            Propulsion::Lpg => storage.liquid_propane_gas = true,
            Propulsion::Electric => storage.electric_energy_storage = true,
            Propulsion::Hydrogen => storage.hydrogen_storage = true,
            Propulsion::Other => storage.other_storage = true,
        }
    }
    storage
}

fn write_output(path: &Path, bytes: &[u8]) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(path, bytes)
        .with_context(|| format!("Failed to write output: {}", path.display()))?;
    Ok(())
}

fn cmd_decode(args: DecodeArgs) -> Result<(), CliError> {
    let shapes = if args.shape.is_empty() {
        WireShape::PRIORITY.to_vec()
    } else {
        args.shape.clone()
    };

    let payloads = if args.file.is_empty() {
        let text = args.hex.join(" ");
        let bytes = ecall_msd_core::parse_hex(&text).map_err(|err| {
            CliError::new(
                format!("invalid hex input: {}", err),
                Some("pass octets as hex digits, e.g. 01 A0 74".to_string()),
            )
        })?;
        vec![("<hex>".to_string(), bytes)]
    } else {
        let mut payloads = Vec::new();
        for pattern in &args.file {
            for path in resolve_input_paths(pattern)? {
                let bytes = fs::read(&path)
                    .with_context(|| format!("Failed to read input file: {}", path.display()))?;
                payloads.push((path.display().to_string(), bytes));
            }
        }
        payloads
    };

    for (label, bytes) in &payloads {
        debug!(input = %label, len = bytes.len(), "decoding payload");
        let decoded = ecall_msd_core::resolve_with(bytes, &shapes).map_err(|err| {
            CliError::new(
                format!("{}: decode failed: {}", label, err),
                Some(format!(
                    "tried shapes: {}",
                    err.tried_shapes()
                        .iter()
                        .map(|shape| shape.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            )
        })?;
        let report = ecall_msd_core::make_report(&decoded, bytes);
        if args.json {
            println!("{}", serialize_report(&report, args.pretty)?);
        } else {
            if payloads.len() > 1 {
                println!("== {}", label);
            }
            print!("{}", render_report(&report));
        }
    }
    Ok(())
}

fn serialize_report(report: &MsdReport, pretty: bool) -> Result<String, CliError> {
    if pretty {
        serde_json::to_string_pretty(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(report)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn render_report(report: &MsdReport) -> String {
    let record = &report.record;
    let control = &record.control;
    let mut out = String::new();

    let _ = writeln!(out, "Shape:            {}", report.shape);
    if let Some(version) = report.msd_version {
        let _ = writeln!(out, "MSD version:      {}", version);
    }
    let _ = writeln!(out, "Payload:          {}", report.payload_hex);
    let _ = writeln!(out, "Message ID:       {}", record.message_identifier);
    let _ = writeln!(
        out,
        "Activation:       {}",
        if control.automatic_activation {
            "automatic"
        } else {
            "manual"
        }
    );
    let _ = writeln!(
        out,
        "Call type:        {}",
        if control.test_call {
            "test"
        } else {
            "emergency"
        }
    );
    let _ = writeln!(
        out,
        "Position trusted: {}",
        if control.position_can_be_trusted {
            "yes"
        } else {
            "no"
        }
    );
    let _ = writeln!(
        out,
        "Vehicle type:     {} ({})",
        report.vehicle_type_name, control.vehicle_type
    );
    let _ = writeln!(out, "VIN:              {}", record.vin);
    let propulsion = if report.propulsion.is_empty() {
        "none declared".to_string()
    } else {
        report.propulsion.join(", ")
    };
    let _ = writeln!(out, "Propulsion:       {}", propulsion);
    let _ = writeln!(
        out,
        "Timestamp:        {} ({})",
        report.timestamp_utc, record.timestamp
    );
    let _ = writeln!(
        out,
        "Latitude:         {} mas ({:.6} deg)",
        record.location.latitude,
        milliarcsec_to_degrees(record.location.latitude)
    );
    let _ = writeln!(
        out,
        "Longitude:        {} mas ({:.6} deg)",
        record.location.longitude,
        milliarcsec_to_degrees(record.location.longitude)
    );
    let direction = match report.direction_degrees {
        Some(degrees) => format!("{} deg", degrees),
        None => "unknown".to_string(),
    };
    let _ = writeln!(out, "Direction:        {}", direction);
    let _ = writeln!(
        out,
        "Recent N-1:       {}",
        describe_delta(&record.recent_location_n1)
    );
    let _ = writeln!(
        out,
        "Recent N-2:       {}",
        describe_delta(&record.recent_location_n2)
    );
    let occupants = match record.number_of_occupants {
        Some(count) => count.to_string(),
        None => "not reported".to_string(),
    };
    let _ = writeln!(out, "Occupants:        {}", occupants);
    out
}

fn milliarcsec_to_degrees(value: i32) -> f64 {
    f64::from(value) / 3_600_000.0
}

fn describe_delta(delta: &LocationDelta) -> String {
    if delta.is_absent() {
        "not available".to_string()
    } else {
        format!(
            "lat {:+} / lon {:+}",
            delta.latitude_delta, delta.longitude_delta
        )
    }
}

fn cmd_validate(args: ValidateArgs) -> Result<(), CliError> {
    let mut failures = Vec::new();

    if let Some(vin) = args.vin.as_ref() {
        match ecall_msd_core::validate_vin(vin) {
            Ok(()) => println!("VIN {}: ok", vin),
            Err(err) => failures.push(format!("VIN {}: {}", vin, err)),
        }
    }
    if let Some(latitude) = args.latitude {
        match ecall_msd_core::validate_coordinates(latitude, 0) {
            Ok(()) => println!("latitude {}: ok", latitude),
            Err(err) => failures.push(format!("latitude {}: {}", latitude, err)),
        }
    }
    if let Some(longitude) = args.longitude {
        match ecall_msd_core::validate_coordinates(0, longitude) {
            Ok(()) => println!("longitude {}: ok", longitude),
            Err(err) => failures.push(format!("longitude {}: {}", longitude, err)),
        }
    }

    if failures.is_empty() {
        return Ok(());
    }
    Err(CliError::new(
        failures.join("; "),
        Some(format!(
            "latitude must be within +/-{} and longitude within +/-{} milliarcseconds",
            LATITUDE_LIMIT, LONGITUDE_LIMIT
        )),
    ))
}

fn resolve_input_paths(pattern: &str) -> Result<Vec<PathBuf>, CliError> {
    if !is_glob_pattern(pattern) {
        let path = PathBuf::from(pattern);
        if !path.is_file() {
            return Err(CliError::new(
                format!("input file not found: {}", path.display()),
                Some("pass a binary payload file or a quoted glob pattern".to_string()),
            ));
        }
        return Ok(vec![path]);
    }

    let mut matches = Vec::new();
    let paths = glob(pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    matches.sort();
    Ok(matches)
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn propulsion_flags_map_to_storage() {
        let storage = propulsion_from(&[Propulsion::Diesel, Propulsion::Electric]);
        assert!(storage.diesel_tank_present);
        assert!(storage.electric_energy_storage);
        assert!(!storage.gasoline_tank_present);
    }

    #[test]
    fn render_report_marks_unknowns() {
        let record = MsdRecord {
            vehicle_direction: 255,
            number_of_occupants: None,
            ..MsdRecord::sample()
        };
        let bytes = ecall_msd_core::encode(&record).unwrap();
        let decoded = ecall_msd_core::resolve(&bytes).unwrap();
        let text = render_report(&ecall_msd_core::make_report(&decoded, &bytes));
        assert!(text.contains("Direction:        unknown"));
        assert!(text.contains("Occupants:        not reported"));
        assert!(text.contains("Recent N-1:       not available"));
    }

    #[test]
    fn glob_detection() {
        assert!(is_glob_pattern("dir/*.bin"));
        assert!(!is_glob_pattern("dir/msd.bin"));
    }
}
