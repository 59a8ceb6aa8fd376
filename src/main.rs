// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use house_estimator::{
    all_profiles, clamp_manual_size, estimate, init_logging, EstimateResult, PostalCode,
};

#[derive(Parser)]
#[command(name = "house-estimator", version, about = "Rough house size, window and energy estimates for Canadian postal codes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate a single postal code
    Estimate {
        postal_code: String,

        /// Province name or abbreviation (defaults to the postal code's province)
        #[arg(long)]
        province: Option<String>,

        /// Manual house size in sq ft (snapped to 500..=5000 in steps of 100)
        #[arg(long)]
        size: Option<u32>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Estimate every row of a CSV file (postal_code[,province][,house_size])
    Batch { input: PathBuf },

    /// Show the per-province estimation table
    Provinces,

    /// Resolve an address or postal code through the geocoder, then estimate
    #[cfg(feature = "geocode")]
    Lookup {
        query: String,

        #[arg(long)]
        size: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Interactive terminal UI
    #[cfg(feature = "tui")]
    Ui { postal_code: Option<String> },
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Estimate { postal_code, province, size, json } => {
            run_estimate(&postal_code, province.as_deref(), size, json)?
        }
        Command::Batch { input } => {
            let file = File::open(&input)
                .with_context(|| format!("Failed to open CSV: {:?}", input))?;
            let stats = run_batch(file, io::stdout().lock())?;
            eprintln!("✓ {} estimated, {} skipped", stats.estimated, stats.skipped);
        }
        Command::Provinces => print_provinces(),
        #[cfg(feature = "geocode")]
        Command::Lookup { query, size, json } => run_lookup(&query, size, json)?,
        #[cfg(feature = "tui")]
        Command::Ui { postal_code } => run_ui_mode(postal_code)?,
    }

    Ok(())
}

// ============================================================================
// ESTIMATE
// ============================================================================

fn run_estimate(input: &str, province: Option<&str>, size: Option<u32>, json: bool) -> Result<()> {
    let code = PostalCode::parse(input)
        .with_context(|| format!("Not a valid Canadian postal code: {:?}", input))?;
    let result = estimate(&code, province, size.map(clamp_manual_size));

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&result);
    }

    Ok(())
}

fn print_result(result: &EstimateResult) {
    println!("🏠 {} - {}", result.postal_code.formatted(), result.province);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!(
        "  Area:        {}",
        if result.is_rural { "Rural" } else { "Urban" }
    );
    println!(
        "  House size:  {} sq ft{}",
        result.house_size,
        if result.size_overridden { " (manual)" } else { "" }
    );
    println!(
        "  Windows:     {} ({} standard, {} large)",
        result.windows, result.window_split.standard, result.window_split.large
    );
    println!("  Electricity: {} kWh/year", result.energy.electricity);
    println!("  Total:       {:.2} GJ/year", result.energy.total);
    println!("  Climate:     {}", result.climate_region);
    println!("\n  Estimates are rough approximations, not measurements.");
}

fn print_provinces() {
    println!(
        "{:<27} {:>11} {:>9} {:>6} {:>8} {:>9} {:>8}  Climate regions",
        "Province", "Size U/R", "Win U/R", "Floor", "kWh/ft²", "GJ/ft²", "Season"
    );
    for profile in all_profiles() {
        let regions: Vec<String> = profile
            .climate_regions
            .iter()
            .map(|r| format!("{} {:.2}", r.name, r.factor))
            .collect();

        println!(
            "{:<27} {:>11} {:>9} {:>6} {:>8.2} {:>9.4} {:>8.2}  {}",
            format!("{} ({})", profile.province, profile.province.abbreviation()),
            format!("{}/{}", profile.house_size.urban, profile.house_size.rural),
            format!("{}/{}", profile.window_ratio.urban, profile.window_ratio.rural),
            profile.rural_window_floor,
            profile.energy.electricity,
            profile.energy.total,
            profile.seasonal_factor,
            regions.join(", "),
        );
    }
}

// ============================================================================
// BATCH
// ============================================================================

#[derive(Debug, Deserialize)]
struct BatchInput {
    postal_code: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    province: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    house_size: Option<u32>,
}

#[derive(Debug, Serialize)]
struct BatchOutput {
    postal_code: String,
    province: &'static str,
    rural: bool,
    house_size: u32,
    size_overridden: bool,
    windows: u32,
    standard_windows: u32,
    large_windows: u32,
    electricity_kwh: u64,
    total_gj: f64,
    climate_region: &'static str,
}

impl From<EstimateResult> for BatchOutput {
    fn from(result: EstimateResult) -> Self {
        BatchOutput {
            postal_code: result.postal_code.to_string(),
            province: result.province.abbreviation(),
            rural: result.is_rural,
            house_size: result.house_size,
            size_overridden: result.size_overridden,
            windows: result.windows,
            standard_windows: result.window_split.standard,
            large_windows: result.window_split.large,
            electricity_kwh: result.energy.electricity,
            total_gj: result.energy.total,
            climate_region: result.climate_region,
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct BatchStats {
    estimated: usize,
    skipped: usize,
}

fn run_batch<R: Read, W: Write>(input: R, output: W) -> Result<BatchStats> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut stats = BatchStats::default();

    for (i, row) in reader.deserialize::<BatchInput>().enumerate() {
        // Header is line 1
        let line = i + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping line {}: {}", line, e);
                stats.skipped += 1;
                continue;
            }
        };

        let code = match PostalCode::parse(&row.postal_code) {
            Ok(code) => code,
            Err(e) => {
                tracing::warn!("Skipping line {} ({:?}): {}", line, row.postal_code, e);
                stats.skipped += 1;
                continue;
            }
        };

        let province = row.province.as_deref().filter(|p| !p.is_empty());
        let result = estimate(&code, province, row.house_size);
        writer.serialize(BatchOutput::from(result))?;
        stats.estimated += 1;
    }

    writer.flush()?;
    Ok(stats)
}

// ============================================================================
// LOOKUP
// ============================================================================

#[cfg(feature = "geocode")]
fn run_lookup(query: &str, size: Option<u32>, json: bool) -> Result<()> {
    use house_estimator::{lookup, Config, GoogleGeocoder};

    let config = Config::from_env()?;
    let geocoder = GoogleGeocoder::new(&config)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let (resolution, result) = runtime
        .block_on(lookup(&geocoder, query, size.map(clamp_manual_size)))?;

    if json {
        let body = serde_json::json!({ "address": resolution, "estimate": result });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        println!("📍 {}", resolution.display_name);
        println!("   ({:.5}, {:.5})\n", resolution.lat, resolution.lon);
        print_result(&result);
    }

    Ok(())
}

// ============================================================================
// UI
// ============================================================================

#[cfg(feature = "tui")]
fn run_ui_mode(postal_code: Option<String>) -> Result<()> {
    let mut app = ui::App::new();
    if let Some(code) = postal_code {
        app.input = code;
        app.submit();
    }
    ui::run_ui(&mut app)?;

    println!("\n✅ UI closed successfully");
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_estimates_and_skips() {
        let input = "postal_code,province,house_size\n\
                     M5V 2T6,,\n\
                     K0A1A0,ON,2000\n\
                     Z1Z1Z1,,\n\
                     T2P1J9,Alberta,\n";
        let mut output = Vec::new();

        let stats = run_batch(input.as_bytes(), &mut output).unwrap();
        assert_eq!(stats, BatchStats { estimated: 3, skipped: 1 });

        let text = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("postal_code,province,rural,house_size"));
        assert!(lines[1].starts_with("M5V2T6,ON,false,1400,false,6,"));
        assert!(lines[2].starts_with("K0A1A0,ON,true,2000,true,12,"));
        assert!(lines[3].starts_with("T2P1J9,AB,false,"));
    }

    #[test]
    fn test_batch_postal_code_only() {
        let input = "postal_code\nH2X 1Y4\n";
        let mut output = Vec::new();

        let stats = run_batch(input.as_bytes(), &mut output).unwrap();
        assert_eq!(stats.estimated, 1);

        let text = String::from_utf8(output).unwrap();
        assert!(text.lines().nth(1).unwrap().starts_with("H2X1Y4,QC,true,1598,"));
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from(["house-estimator", "estimate", "M5V2T6", "--size", "2000"]).unwrap();
        match cli.command {
            Command::Estimate { postal_code, size, json, .. } => {
                assert_eq!(postal_code, "M5V2T6");
                assert_eq!(size, Some(2000));
                assert!(!json);
            }
            _ => panic!("expected estimate command"),
        }
    }
}
