mod sync;
mod telemetry;
mod web;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use crate::sync::{parse_anchor_duration, parse_detection_timestamp, QueryResult, SyncSession};
use crate::telemetry::load_telemetry;

#[derive(Parser)]
#[command(name = "telesync")]
#[command(about = "Drone telemetry clock synchronization")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a telemetry subtitle file
    Validate { telemetry: PathBuf },
    /// Calibrate against one correspondence point and run queries
    Query {
        telemetry: PathBuf,
        /// Recording-relative anchor (HH:MM:SS,mmm)
        #[arg(long)]
        anchor: String,
        /// Detection-clock timestamp matching the anchor
        #[arg(long)]
        detection_time: String,
        /// Detection-clock timestamps to look up
        timestamps: Vec<String>,
        /// Read additional timestamps from a file, one per line
        #[arg(long)]
        from: Option<PathBuf>,
        /// Emit one JSON object per query instead of text
        #[arg(long)]
        json: bool,
    },
    /// Run the HTTP query API
    Serve {
        #[arg(long, default_value = "telesync.yaml")]
        config: String,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { telemetry } => validate(&telemetry),
        Commands::Query {
            telemetry,
            anchor,
            detection_time,
            timestamps,
            from,
            json,
        } => query(&telemetry, &anchor, &detection_time, timestamps, from, json),
        Commands::Serve { config } => serve(&config),
    }
}

fn validate(path: &Path) -> ExitCode {
    let series = match load_telemetry(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading telemetry: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Telemetry is valid ({} records)", series.len());
    if let (Some(first), Some(last)) = (series.first(), series.last()) {
        println!("  first: {}", first.timestamp);
        println!("  last:  {}", last.timestamp);
    }
    ExitCode::SUCCESS
}

fn query(
    path: &Path,
    anchor: &str,
    detection_time: &str,
    timestamps: Vec<String>,
    from: Option<PathBuf>,
    json: bool,
) -> ExitCode {
    let series = match load_telemetry(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error reading telemetry: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let anchor = match parse_anchor_duration(anchor) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let sync_point = match parse_detection_timestamp(detection_time) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let session = match SyncSession::calibrate(series, anchor, sync_point) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error calibrating: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !json {
        println!("Offset (detection - telemetry): {}", session.offset());
    }

    let mut inputs = timestamps;
    if let Some(from) = from {
        match fs::read_to_string(&from) {
            Ok(content) => inputs.extend(
                content
                    .lines()
                    .map(|l| l.trim().to_string())
                    .filter(|l| !l.is_empty()),
            ),
            Err(e) => {
                eprintln!("Error reading {}: {}", from.display(), e);
                return ExitCode::FAILURE;
            }
        }
    }

    // A bad timestamp only fails its own query; the session keeps serving.
    let mut failures = 0;
    for input in &inputs {
        let result = parse_detection_timestamp(input).and_then(|t| session.query(t));
        match result {
            Ok(result) => print_result(input, &result, json),
            Err(e) => {
                eprintln!("{}: {}", input, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_result(input: &str, result: &QueryResult, json: bool) {
    if json {
        let line = serde_json::json!({
            "query": input,
            "corrected": result.corrected,
            "latitude_deg": result.record.latitude_deg,
            "longitude_deg": result.record.longitude_deg,
            "altitude_m": result.record.altitude_m,
            "timestamp": result.record.timestamp,
            "residual_ms": result.residual_ms(),
        });
        println!("{}", line);
    } else {
        println!("{} -> corrected {}", input, result.corrected);
        println!("  latitude:  {}", result.record.latitude_deg);
        println!("  longitude: {}", result.record.longitude_deg);
        println!("  altitude:  {} m", result.record.altitude_m);
        println!("  gps timestamp: {}", result.record.timestamp);
        println!("  precision: {:.2} ms", result.residual_ms());
    }
}

fn serve(config_path: &str) -> ExitCode {
    let config = match web::Config::from_file(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error reading config: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = runtime.block_on(web::run_server(config)) {
        eprintln!("Server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
