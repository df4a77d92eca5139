//! CLI entry point for the bikeshare statistics explorer.
//!
//! Provides a one-shot `analyze` subcommand and an `interactive` mode that
//! walks through city and filter selection, prints the statistics report,
//! and can page through raw trips.

use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use bikeshare_stats::{
    derive::{Trip, derive},
    filter::{DayChoice, FilterSpec, Month, MonthChoice, Weekday, apply},
    loader::load_trips,
    output::print_json,
    schema::{City, CitySchema, resolve},
    stats::Report,
};

#[derive(Parser)]
#[command(name = "bikeshare_stats")]
#[command(about = "Explore US bikeshare trip data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FilterKind {
    None,
    Month,
    Day,
    Both,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute statistics for one city with an optional time filter
    Analyze {
        /// City dataset to analyze
        #[arg(value_enum)]
        city: City,

        /// Which time filter to apply
        #[arg(short, long, value_enum, default_value = "none")]
        filter: FilterKind,

        /// Month for the month/both filters (January through June; "all"
        /// is accepted for the month filter)
        #[arg(short, long, value_name = "MONTH")]
        month: Option<String>,

        /// Weekday for the day/both filters ("all" is accepted for the day
        /// filter)
        #[arg(short, long, value_name = "DAY")]
        day: Option<String>,

        /// Directory containing the city CSV files
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print the first N matching trips after the report
        #[arg(long, value_name = "N")]
        show_rows: Option<usize>,
    },
    /// Prompt-driven exploration with a restart loop
    Interactive {
        /// Directory containing the city CSV files
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file; reports go to stdout
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/bikeshare_stats.log".to_string());
    let log_path = Path::new(&log_file_path);
    let log_dir = log_path.parent().unwrap_or(Path::new("logs"));
    let log_file_name = log_path
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("bikeshare_stats.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            city,
            filter,
            month,
            day,
            data_dir,
            json,
            show_rows,
        } => {
            let spec = build_filter_spec(filter, month.as_deref(), day.as_deref())?;
            let data_dir = resolve_data_dir(data_dir);
            let schema = resolve(city);

            let trips = load_dataset(&schema, &data_dir)?;
            let subset = apply(&trips, &spec);
            info!(city = %schema.city, filter = %spec, matched = subset.len(), "Filter applied");

            let report = Report::compute(&subset, &spec, &schema)?;
            if json {
                print_json(&report)?;
            } else {
                println!("{report}");
            }

            if let Some(n) = show_rows {
                for trip in subset.iter().take(n) {
                    println!("{trip:?}");
                }
            }
        }
        Commands::Interactive { data_dir } => {
            let data_dir = resolve_data_dir(data_dir);
            run_interactive(&data_dir)?;
        }
    }

    Ok(())
}

/// Turns validated CLI flags into a filter spec, rejecting combinations the
/// selected filter kind cannot use.
fn build_filter_spec(
    kind: FilterKind,
    month: Option<&str>,
    day: Option<&str>,
) -> Result<FilterSpec> {
    if kind != FilterKind::Month && kind != FilterKind::Both && month.is_some() {
        warn!(filter = ?kind, "--month is ignored by this filter");
    }
    if kind != FilterKind::Day && kind != FilterKind::Both && day.is_some() {
        warn!(filter = ?kind, "--day is ignored by this filter");
    }

    match kind {
        FilterKind::None => Ok(FilterSpec::None),
        FilterKind::Month => {
            let Some(raw) = month else {
                bail!("--filter month requires --month");
            };
            if raw.eq_ignore_ascii_case("all") {
                Ok(FilterSpec::Month(MonthChoice::All))
            } else {
                Ok(FilterSpec::Month(MonthChoice::Only(parse_month(raw)?)))
            }
        }
        FilterKind::Day => {
            let Some(raw) = day else {
                bail!("--filter day requires --day");
            };
            if raw.eq_ignore_ascii_case("all") {
                Ok(FilterSpec::Day(DayChoice::All))
            } else {
                Ok(FilterSpec::Day(DayChoice::Only(parse_day(raw)?)))
            }
        }
        FilterKind::Both => {
            let Some(month) = month else {
                bail!("--filter both requires --month");
            };
            let Some(day) = day else {
                bail!("--filter both requires --day");
            };
            Ok(FilterSpec::Both {
                month: parse_month(month)?,
                day: parse_day(day)?,
            })
        }
    }
}

fn parse_month(raw: &str) -> Result<Month> {
    Month::parse(raw)
        .ok_or_else(|| anyhow::anyhow!("unrecognized month {raw:?} (expected January through June)"))
}

fn parse_day(raw: &str) -> Result<Weekday> {
    Weekday::parse(raw)
        .ok_or_else(|| anyhow::anyhow!("unrecognized weekday {raw:?} (expected a full weekday name)"))
}

fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var("BIKESHARE_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Loads and derives the full dataset for one city.
#[tracing::instrument(skip(schema), fields(city = %schema.city))]
fn load_dataset(schema: &CitySchema, data_dir: &Path) -> Result<Vec<Trip>> {
    let load_start = std::time::Instant::now();
    let raws = load_trips(schema, data_dir)?;
    let trips = derive(raws)?;
    debug!(
        elapsed_ms = load_start.elapsed().as_millis() as u64,
        trips = trips.len(),
        "Dataset loaded"
    );
    Ok(trips)
}

fn run_interactive(data_dir: &Path) -> Result<()> {
    println!("Hello! Let's explore some US bikeshare data!");

    loop {
        let city = prompt_city()?;
        let spec = prompt_filter()?;
        let schema = resolve(city);

        let trips = load_dataset(&schema, data_dir)?;
        let subset = apply(&trips, &spec);
        info!(city = %schema.city, filter = %spec, matched = subset.len(), "Filter applied");

        match Report::compute(&subset, &spec, &schema) {
            Ok(report) => println!("{report}"),
            Err(e) => println!("No statistics available: {e}"),
        }

        page_raw_trips(&subset)?;

        if !prompt_yes_no("\nWould you like to restart? (yes/no): ")? {
            break;
        }
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn prompt_yes_no(label: &str) -> Result<bool> {
    Ok(prompt(label)?.eq_ignore_ascii_case("yes"))
}

fn prompt_city() -> Result<City> {
    loop {
        let input = prompt("Which city would you like to analyze (Chicago, New York City, Washington): ")?;
        match input.parse::<City>() {
            Ok(city) => return Ok(city),
            Err(e) => println!("{e}"),
        }
    }
}

fn prompt_filter() -> Result<FilterSpec> {
    loop {
        let input = prompt("Filter by month, day, both, or none: ")?;
        match input.to_lowercase().as_str() {
            "none" => return Ok(FilterSpec::None),
            "month" => return Ok(FilterSpec::Month(MonthChoice::Only(prompt_month()?))),
            "day" => return Ok(FilterSpec::Day(DayChoice::Only(prompt_day()?))),
            "both" => {
                return Ok(FilterSpec::Both {
                    month: prompt_month()?,
                    day: prompt_day()?,
                });
            }
            _ => println!("Please enter month, day, both, or none."),
        }
    }
}

fn prompt_month() -> Result<Month> {
    loop {
        let input = prompt("Which month? (January through June): ")?;
        match Month::parse(&input) {
            Some(month) => return Ok(month),
            None => println!("Please enter a full month name between January and June."),
        }
    }
}

fn prompt_day() -> Result<Weekday> {
    loop {
        let input = prompt("Which day of the week? (full weekday name): ")?;
        match Weekday::parse(&input) {
            Some(day) => return Ok(day),
            None => println!("Please enter a full weekday name, e.g. Monday."),
        }
    }
}

/// Pages the filtered trips five at a time, mirroring the raw-data view of
/// the prompt loop.
fn page_raw_trips(subset: &[&Trip]) -> Result<()> {
    if subset.is_empty() {
        return Ok(());
    }
    if !prompt_yes_no("\nWould you like to view 5 rows of individual trip data? (yes/no): ")? {
        return Ok(());
    }

    let mut start = 0;
    while start < subset.len() {
        let end = (start + 5).min(subset.len());
        for trip in &subset[start..end] {
            println!("{trip:?}");
        }
        start = end;

        if start >= subset.len() {
            println!("No more trips to display.");
            break;
        }
        if !prompt_yes_no("Do you wish to continue? (yes/no): ")? {
            break;
        }
    }

    Ok(())
}
