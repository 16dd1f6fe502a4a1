//! `avgrid` CLI — normalize availability schedules, measure them across DST, and
//! edit a single day as a grid of cells.
//!
//! ## Usage
//!
//! ```sh
//! # Canonicalize a schedule (stdin → stdout)
//! echo '{"2024-03-09":[{"start_time":"23:30:00","end_time":"01:00:00"}]}' | avgrid normalize
//!
//! # Drop dates left without windows
//! avgrid normalize -i schedule.json -o canonical.json --drop-empty
//!
//! # Real elapsed minutes per window in a given timezone (host local time if omitted)
//! avgrid segments -i schedule.json --tz America/New_York
//!
//! # Show one date as 30-minute cells, drag-fill 08:00-11:30 and clear 09:00-09:30
//! avgrid grid --date 2024-03-11 -i schedule.json --granularity 30 \
//!   --fill 08:00-11:30 --clear 09:00-09:30
//! ```

use std::io::{self, Read};
use std::ops::RangeInclusive;

use anyhow::{Context, Result};
use availability_grid::{normalize_schedule, schedule_segments, DayBits, Granularity, WeekSchedule};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "avgrid",
    version,
    about = "Availability schedule normalizer and day-grid editor"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log to stderr (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Split, sort and merge a schedule into canonical form
    Normalize {
        /// Input schedule JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Omit dates that hold no windows
        #[arg(long)]
        drop_empty: bool,
    },
    /// Print DST-aware segments for every window of a normalized schedule
    Segments {
        /// Input schedule JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// IANA timezone (e.g., "America/New_York"); host local time if omitted
        #[arg(long)]
        tz: Option<String>,
    },
    /// Render one date as a row of cells, optionally editing it first
    Grid {
        /// Calendar date to render (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Input schedule JSON (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Cell width in minutes; must divide 1440
        #[arg(long, default_value_t = 15)]
        granularity: u32,
        /// Set the cells in HH:MM-HH:MM (end exclusive); repeatable, applied before --clear
        #[arg(long)]
        fill: Vec<String>,
        /// Clear the cells in HH:MM-HH:MM (end exclusive); repeatable
        #[arg(long)]
        clear: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Normalize {
            input,
            output,
            drop_empty,
        } => {
            let schedule = read_schedule(input.as_deref())?;
            let mut normalized =
                normalize_schedule(&schedule).context("Failed to normalize schedule")?;
            if drop_empty {
                normalized = normalized.without_empty_days();
            }
            info!(dates = normalized.len(), "normalized schedule");
            write_output(output.as_deref(), &normalized.to_json_pretty()?)?;
        }
        Commands::Segments { input, output, tz } => {
            let schedule = read_schedule(input.as_deref())?;
            let normalized =
                normalize_schedule(&schedule).context("Failed to normalize schedule")?;

            let segments = match tz.as_deref() {
                Some(name) => {
                    let tz: chrono_tz::Tz = name
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid timezone: {}", name))?;
                    schedule_segments(&normalized, &tz)
                }
                None => schedule_segments(&normalized, &chrono::Local),
            }
            .context("Failed to build day segments")?;
            info!(segments = segments.len(), "built day segments");

            let json = serde_json::to_string_pretty(&segments)?;
            write_output(output.as_deref(), &json)?;
        }
        Commands::Grid {
            date,
            input,
            granularity,
            fill,
            clear,
        } => {
            let granularity = Granularity::new(granularity)?;
            let schedule = read_schedule(input.as_deref())?;
            let normalized =
                normalize_schedule(&schedule).context("Failed to normalize schedule")?;

            let mut bits = DayBits::from_windows(normalized.get(date).unwrap_or(&[]), granularity);
            for (range_arg, value) in fill
                .iter()
                .map(|s| (s, true))
                .chain(clear.iter().map(|s| (s, false)))
            {
                let range = parse_cell_range(range_arg, granularity)?;
                debug!(%date, cells = %range_arg, ?range, value, "editing cells");
                bits = bits.fill(range, value);
            }

            let windows = bits.to_windows();
            println!("{}", bits);
            println!("{}", serde_json::to_string(&windows)?);
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

/// Parse `HH:MM-HH:MM` into the inclusive range of cells it covers.
///
/// Both ends must sit on a cell boundary. The end may be `24:00`.
fn parse_cell_range(range_arg: &str, granularity: Granularity) -> Result<RangeInclusive<usize>> {
    let (start, end) = range_arg
        .split_once('-')
        .with_context(|| format!("Expected HH:MM-HH:MM, got '{}'", range_arg))?;

    let start = parse_boundary(start, granularity)?;
    let end = parse_boundary(end, granularity)?;
    if end <= start {
        anyhow::bail!("Empty or reversed cell range: '{}'", range_arg);
    }

    Ok(start..=end - 1)
}

fn parse_boundary(time: &str, granularity: Granularity) -> Result<usize> {
    let (hour, minute) = time
        .split_once(':')
        .with_context(|| format!("Expected HH:MM, got '{}'", time))?;
    let hour: u32 = hour
        .parse()
        .with_context(|| format!("Invalid hour in '{}'", time))?;
    let minute: u32 = minute
        .parse()
        .with_context(|| format!("Invalid minute in '{}'", time))?;

    if (hour, minute) == (24, 0) {
        return Ok(granularity.cells_per_day());
    }
    Ok(granularity.idx(hour, minute)?)
}

fn read_schedule(path: Option<&str>) -> Result<WeekSchedule> {
    let json = read_input(path)?;
    WeekSchedule::from_json(&json).context("Failed to parse schedule JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
