//! Hydro CLI - Command-line interface for Hydro Pace
//!
//! Commands:
//! - status: Today's intake, pacing and next-checkpoint guidance
//! - week: Seven-day totals and goal streak
//! - month: Calendar heatmap for one month
//! - add / undo: Edit an entries file
//! - validate: Check entries for values the engine cannot aggregate
//! - doctor: Diagnose settings and environment

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt::Display;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use hydro_pace::pipeline::{monthly_summary, today_status, weekly_summary, HydrationTracker};
use hydro_pace::settings::parse_quick_amounts;
use hydro_pace::store::{parse_array, parse_ndjson, validate_entries, validate_entry};
use hydro_pace::types::{DrinkType, Entry, MonthGrid, TodayStatus, WeeklyStats};
use hydro_pace::window::{shift_month, supported_instant};
use hydro_pace::{ComputeError, EntrySource, MemoryStore, Settings, HYDRO_VERSION, PRODUCER_NAME};

/// Hydro - Pacing and history for daily fluid intake
#[derive(Parser)]
#[command(name = "hydro")]
#[command(version = HYDRO_VERSION)]
#[command(about = "Track daily fluid intake against a paced goal", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show today's intake, pacing and guidance
    Status {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        clock: ClockArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Show the last seven days and the goal streak
    Week {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        clock: ClockArgs,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Show a calendar month as a heatmap
    Month {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        settings: SettingsArgs,

        #[command(flatten)]
        clock: ClockArgs,

        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,

        /// Months to move from the selected month (e.g. -1 for the previous one)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,

        /// Output format
        #[arg(long, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Record an intake in an entries file (JSON array)
    Add {
        /// Entries file, created if missing
        #[arg(short, long)]
        file: PathBuf,

        /// Amount consumed (ml)
        #[arg(short, long)]
        amount: f64,

        /// Beverage kind (water, coffee, tea, other)
        #[arg(short = 't', long = "type", default_value = "water")]
        drink_type: DrinkType,

        /// Instant of the intake (ms since epoch), defaults to now
        #[arg(long)]
        at: Option<i64>,
    },

    /// Remove an intake from an entries file by id
    Undo {
        /// Entries file (JSON array)
        #[arg(short, long)]
        file: PathBuf,

        /// Id of the entry to remove
        #[arg(long)]
        id: String,
    },

    /// Validate entries
    Validate {
        #[command(flatten)]
        input: InputArgs,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose settings and environment
    Doctor {
        /// Check a settings file
        #[arg(long)]
        settings: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Entries file path (use - for stdin)
    #[arg(short, long)]
    input: PathBuf,

    /// Input format
    #[arg(long, default_value = "json")]
    input_format: InputFormat,
}

#[derive(Args)]
struct SettingsArgs {
    /// Settings file (JSON); defaults apply when omitted
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Daily goal (ml)
    #[arg(long)]
    goal: Option<f64>,

    /// Start of the drinking window (hour, 0-23)
    #[arg(long)]
    wake: Option<u32>,

    /// End of the drinking window (hour, 0-23)
    #[arg(long)]
    sleep: Option<u32>,

    /// Checkpoint step (minutes)
    #[arg(long)]
    step: Option<u32>,

    /// Quick amounts, e.g. "150, 250, 500"
    #[arg(long)]
    quick: Option<String>,
}

#[derive(Args)]
struct ClockArgs {
    /// Reference instant (ms since epoch), defaults to now
    #[arg(long)]
    now: Option<i64>,

    /// Fixed UTC offset in minutes, defaults to the system time zone
    #[arg(long, allow_hyphen_values = true)]
    offset_minutes: Option<i32>,
}

#[derive(Clone, ValueEnum)]
enum InputFormat {
    /// Newline-delimited JSON (one entry per line)
    Ndjson,
    /// JSON array of entries
    Json,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(&cli.log_level) {
        eprintln!("{}", serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string()));
        return ExitCode::FAILURE;
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", serde_json::to_string(&CliError::from(e)).unwrap_or_else(|_| "Unknown error".to_string()));
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr subscriber; RUST_LOG wins over `--log-level`
fn init_tracing(level: &str) -> Result<(), HydroCliError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init()
        .map_err(|e| HydroCliError::Logging(e.to_string()))
}

fn run(cli: Cli) -> Result<(), HydroCliError> {
    match cli.command {
        Commands::Status {
            input,
            settings,
            clock,
            output_format,
        } => {
            let store = load_store(&input, &settings)?;
            let now_ms = clock.now_ms();
            match clock.offset_minutes {
                Some(minutes) => cmd_status(&store, &fixed_zone(minutes)?, now_ms, &output_format),
                None => cmd_status(&store, &Local, now_ms, &output_format),
            }
        }

        Commands::Week {
            input,
            settings,
            clock,
            output_format,
        } => {
            let store = load_store(&input, &settings)?;
            let now_ms = clock.now_ms();
            match clock.offset_minutes {
                Some(minutes) => cmd_week(&store, &fixed_zone(minutes)?, now_ms, &output_format),
                None => cmd_week(&store, &Local, now_ms, &output_format),
            }
        }

        Commands::Month {
            input,
            settings,
            clock,
            month,
            shift,
            output_format,
        } => {
            let store = load_store(&input, &settings)?;
            let now_ms = clock.now_ms();
            let month = month.as_deref();
            match clock.offset_minutes {
                Some(minutes) => cmd_month(
                    &store,
                    &fixed_zone(minutes)?,
                    now_ms,
                    month,
                    shift,
                    &output_format,
                ),
                None => cmd_month(&store, &Local, now_ms, month, shift, &output_format),
            }
        }

        Commands::Add {
            file,
            amount,
            drink_type,
            at,
        } => cmd_add(&file, amount, drink_type, at),

        Commands::Undo { file, id } => cmd_undo(&file, &id),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Doctor { settings, json } => cmd_doctor(settings.as_deref(), json),
    }
}

fn cmd_status<Tz>(
    store: &MemoryStore,
    tz: &Tz,
    now_ms: i64,
    output_format: &OutputFormat,
) -> Result<(), HydroCliError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let now = zoned_now(tz, now_ms)?;
    let status = today_status(store, &now)?;

    match output_format {
        OutputFormat::Text => print_status(&status, tz),
        _ => println!("{}", format_json(&status, output_format)?),
    }

    Ok(())
}

fn cmd_week<Tz: TimeZone>(
    store: &MemoryStore,
    tz: &Tz,
    now_ms: i64,
    output_format: &OutputFormat,
) -> Result<(), HydroCliError> {
    let now = zoned_now(tz, now_ms)?;
    let stats = weekly_summary(store, &now)?;

    match output_format {
        OutputFormat::Text => print_week(&stats, goal_of(store)),
        _ => println!("{}", format_json(&stats, output_format)?),
    }

    Ok(())
}

fn cmd_month<Tz: TimeZone>(
    store: &MemoryStore,
    tz: &Tz,
    now_ms: i64,
    month: Option<&str>,
    shift: i32,
    output_format: &OutputFormat,
) -> Result<(), HydroCliError> {
    let (year, month) = match month {
        Some(text) => parse_month(text)?,
        None => {
            let now = zoned_now(tz, now_ms)?;
            (now.year(), now.month())
        }
    };
    let (year, month) = shift_month(year, month, shift).ok_or_else(|| {
        HydroCliError::InvalidArgument(format!("cannot shift {}-{:02} by {} months", year, month, shift))
    })?;
    debug!(year, month, "selected month");

    let grid = monthly_summary(store, year, month, tz)?;

    match output_format {
        OutputFormat::Text => print_month(&grid),
        _ => println!("{}", format_json(&grid, output_format)?),
    }

    Ok(())
}

fn cmd_add(
    file: &Path,
    amount_ml: f64,
    drink_type: DrinkType,
    at: Option<i64>,
) -> Result<(), HydroCliError> {
    let timestamp = at.unwrap_or_else(|| Utc::now().timestamp_millis());
    validate_entry(&Entry::new(timestamp, amount_ml, drink_type))
        .map_err(|e| HydroCliError::InvalidArgument(e.to_string()))?;

    let mut tracker = HydrationTracker::new();
    if file.exists() {
        tracker.load_entries(&fs::read_to_string(file)?)?;
    }

    let id = tracker.add(timestamp, amount_ml, drink_type);
    fs::write(file, tracker.save_entries()?)?;
    info!(id = %id, amount_ml, "added entry");

    println!("{}", id);
    Ok(())
}

fn cmd_undo(file: &Path, id: &str) -> Result<(), HydroCliError> {
    let mut tracker = HydrationTracker::new();
    tracker.load_entries(&fs::read_to_string(file)?)?;

    let removed = tracker
        .undo(id)
        .ok_or_else(|| HydroCliError::EntryNotFound(id.to_string()))?;
    fs::write(file, tracker.save_entries()?)?;
    info!(id, amount_ml = removed.amount_ml, "removed entry");

    println!("Removed {} ml {}", removed.amount_ml, removed.drink_type.as_str());
    Ok(())
}

fn cmd_validate(input: &InputArgs, json: bool) -> Result<(), HydroCliError> {
    let entries = read_entries(input)?;
    let results = validate_entries(&entries);

    let report = ValidationReport {
        total_entries: entries.len(),
        valid_entries: entries.len() - results.len(),
        invalid_entries: results.len(),
        errors: results
            .iter()
            .map(|r| ValidationErrorDetail {
                index: r.index,
                entry_id: r.entry_id.clone(),
                error: r.issue.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total entries:   {}", report.total_entries);
        println!("Valid entries:   {}", report.valid_entries);
        println!("Invalid entries: {}", report.invalid_entries);

        if !report.errors.is_empty() {
            println!("\nErrors:");
            for err in &report.errors {
                println!(
                    "  - Entry {} (index {}): {}",
                    err.entry_id.as_deref().unwrap_or("unknown"),
                    err.index,
                    err.error
                );
            }
        }
    }

    if report.invalid_entries > 0 {
        Err(HydroCliError::ValidationFailed(report.invalid_entries))
    } else {
        Ok(())
    }
}

fn cmd_doctor(settings: Option<&Path>, json: bool) -> Result<(), HydroCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "hydro_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Hydro Pace version {}", HYDRO_VERSION),
    });

    // Check settings file if provided
    match settings {
        Some(path) if path.exists() => {
            let check = match fs::read_to_string(path) {
                Ok(content) => match Settings::from_json(&content).and_then(|s| {
                    s.validate()?;
                    Ok(s)
                }) {
                    Ok(s) => DoctorCheck {
                        name: "settings".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Settings valid (goal {} ml, window {:02}:00-{:02}:00, step {} min)",
                            s.daily_goal_ml, s.wake_hour, s.sleep_hour, s.step_minutes
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "settings".to_string(),
                        status: CheckStatus::Error,
                        message: e.to_string(),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "settings".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read settings file: {}", e),
                },
            };
            checks.push(check);
        }
        Some(_) => checks.push(DoctorCheck {
            name: "settings".to_string(),
            status: CheckStatus::Warning,
            message: "Settings file does not exist, defaults apply".to_string(),
        }),
        None => checks.push(DoctorCheck {
            name: "settings".to_string(),
            status: CheckStatus::Ok,
            message: "No settings file, defaults apply".to_string(),
        }),
    }

    checks.push(DoctorCheck {
        name: "timezone".to_string(),
        status: CheckStatus::Ok,
        message: format!("System UTC offset {}", Local::now().offset()),
    });

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (pass entries with --input <file>)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (--input - ready)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: HYDRO_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Hydro Doctor Report");
        println!("===================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report.checks.iter().any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(HydroCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

impl ClockArgs {
    fn now_ms(&self) -> i64 {
        self.now.unwrap_or_else(|| Utc::now().timestamp_millis())
    }
}

fn fixed_zone(minutes: i32) -> Result<FixedOffset, HydroCliError> {
    FixedOffset::east_opt(minutes.saturating_mul(60))
        .ok_or(HydroCliError::Compute(ComputeError::InvalidOffset(minutes)))
}

fn zoned_now<Tz: TimeZone>(tz: &Tz, now_ms: i64) -> Result<DateTime<Tz>, HydroCliError> {
    supported_instant(now_ms)
        .map(|utc| utc.with_timezone(tz))
        .ok_or_else(|| HydroCliError::Compute(ComputeError::InvalidTimestamp(now_ms.to_string())))
}

fn parse_month(text: &str) -> Result<(i32, u32), HydroCliError> {
    NaiveDate::parse_from_str(&format!("{}-01", text.trim()), "%Y-%m-%d")
        .map(|date| (date.year(), date.month()))
        .map_err(|_| HydroCliError::InvalidArgument(format!("expected YYYY-MM, got '{}'", text)))
}

fn read_input(path: &Path) -> Result<String, HydroCliError> {
    if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn read_entries(input: &InputArgs) -> Result<Vec<Entry>, HydroCliError> {
    let data = read_input(&input.input)?;
    let entries = match input.input_format {
        InputFormat::Ndjson => parse_ndjson(&data)?,
        InputFormat::Json => parse_array(&data)?,
    };
    debug!(count = entries.len(), "read entries");
    Ok(entries)
}

/// Settings file (or defaults) with command-line overrides applied
fn resolve_settings(args: &SettingsArgs) -> Result<Settings, HydroCliError> {
    let mut settings = match &args.settings {
        Some(path) => Settings::from_json(&fs::read_to_string(path)?)?,
        None => Settings::default(),
    };

    if let Some(goal) = args.goal {
        settings.daily_goal_ml = goal;
    }
    if let Some(wake) = args.wake {
        settings.wake_hour = wake;
    }
    if let Some(sleep) = args.sleep {
        settings.sleep_hour = sleep;
    }
    if let Some(step) = args.step {
        settings.step_minutes = step;
    }
    if let Some(quick) = &args.quick {
        settings.quick_amounts_ml = parse_quick_amounts(quick).ok_or_else(|| {
            HydroCliError::InvalidArgument(format!("no positive amounts in '{}'", quick))
        })?;
    }

    settings.validate()?;
    Ok(settings)
}

fn load_store(input: &InputArgs, settings: &SettingsArgs) -> Result<MemoryStore, HydroCliError> {
    let mut store = MemoryStore::with_entries(read_entries(input)?);
    store.set_settings(resolve_settings(settings)?);
    Ok(store)
}

fn goal_of(store: &MemoryStore) -> f64 {
    store.settings().unwrap_or_default().daily_goal_ml
}

fn format_json<T: serde::Serialize>(
    value: &T,
    format: &OutputFormat,
) -> Result<String, HydroCliError> {
    match format {
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
        _ => Ok(serde_json::to_string(value)?),
    }
}

fn print_status<Tz>(status: &TodayStatus, tz: &Tz)
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    println!("Today {}", status.date);
    println!("  Intake:    {} / {} ml ({}%)", status.total_ml, status.goal_ml, status.progress_pct);
    println!("  Expected:  {} ml", status.pacing.expected_ml);
    println!(
        "  Pacing:    {} ({:+} ml)",
        status.pacing.label.as_str(),
        status.pacing.diff_ml
    );
    println!(
        "  Next:      {} ml by {}",
        status.guidance.need_ml,
        status.guidance.at.format("%H:%M")
    );
    if let Some(suggestion) = &status.suggestion {
        println!("  Suggest:   drink {} ml", suggestion.amount_ml);
    }

    if !status.entries.is_empty() {
        println!("\nEntries:");
        for entry in &status.entries {
            let time = DateTime::from_timestamp_millis(entry.timestamp)
                .map(|utc| utc.with_timezone(tz).format("%H:%M").to_string())
                .unwrap_or_else(|| "--:--".to_string());
            println!("  {}  {:>5} ml  {}", time, entry.amount_ml, entry.drink_type.as_str());
        }
    }
}

fn print_week(stats: &WeeklyStats, goal_ml: f64) {
    const BAR_WIDTH: f64 = 20.0;

    println!("Last 7 days (goal {} ml)", goal_ml);
    for day in &stats.days {
        let filled = ((day.total_ml / goal_ml.max(1.0)).min(1.0) * BAR_WIDTH).round() as usize;
        let bar = format!("{}{}", "#".repeat(filled), "-".repeat(BAR_WIDTH as usize - filled));
        let mark = if day.total_ml >= goal_ml { "*" } else { " " };
        println!(
            "  {} {}  {} {:>6} ml {}",
            day.date.format("%a"),
            day.date.format("%m-%d"),
            bar,
            day.total_ml,
            mark
        );
    }
    println!("Streak: {} day(s)", stats.streak);
}

fn print_month(grid: &MonthGrid) {
    println!("{}-{:02}", grid.year, grid.month);
    println!("  Mon  Tue  Wed  Thu  Fri  Sat  Sun");
    for week in &grid.weeks {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                Some(cell) => {
                    let mark = if cell.met_goal {
                        '*'
                    } else if cell.total_ml > 0.0 {
                        '+'
                    } else {
                        ' '
                    };
                    format!("{:>3}{}", cell.date.day(), mark)
                }
                None => "    ".to_string(),
            })
            .collect();
        println!("  {}", row.join(" "));
    }
    println!("\n  * goal met   + some intake");
}

// Error types

#[derive(Debug)]
enum HydroCliError {
    Io(io::Error),
    Compute(ComputeError),
    Json(serde_json::Error),
    InvalidArgument(String),
    EntryNotFound(String),
    ValidationFailed(usize),
    DoctorFailed,
    Logging(String),
}

impl From<io::Error> for HydroCliError {
    fn from(e: io::Error) -> Self {
        HydroCliError::Io(e)
    }
}

impl From<ComputeError> for HydroCliError {
    fn from(e: ComputeError) -> Self {
        HydroCliError::Compute(e)
    }
}

impl From<serde_json::Error> for HydroCliError {
    fn from(e: serde_json::Error) -> Self {
        HydroCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<HydroCliError> for CliError {
    fn from(e: HydroCliError) -> Self {
        match e {
            HydroCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            HydroCliError::Compute(e) => CliError::from(e),
            HydroCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            HydroCliError::InvalidArgument(msg) => CliError {
                code: "INVALID_ARGUMENT".to_string(),
                message: msg,
                hint: Some("Run 'hydro --help' for usage".to_string()),
            },
            HydroCliError::EntryNotFound(id) => CliError {
                code: "ENTRY_NOT_FOUND".to_string(),
                message: format!("No entry with id {}", id),
                hint: Some("Entry ids are printed by 'hydro add'".to_string()),
            },
            HydroCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} entries failed validation", count),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            HydroCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
            HydroCliError::Logging(msg) => CliError {
                code: "LOGGING_ERROR".to_string(),
                message: msg,
                hint: Some("Check the RUST_LOG filter syntax".to_string()),
            },
        }
    }
}

impl From<ComputeError> for CliError {
    fn from(e: ComputeError) -> Self {
        let (code, hint) = match &e {
            ComputeError::ParseError(_) => (
                "PARSE_ERROR",
                "Ensure entries carry timestamp (ms) and amount_ml",
            ),
            ComputeError::JsonError(_) => ("JSON_ERROR", "Check JSON syntax"),
            ComputeError::InvalidSettings(_) => (
                "INVALID_SETTINGS",
                "Run 'hydro doctor --settings <file>' for details",
            ),
            ComputeError::InvalidDate(_) => ("INVALID_DATE", "Use --month YYYY-MM with a month of 1-12"),
            ComputeError::InvalidTimestamp(_) => (
                "INVALID_TIMESTAMP",
                "Pass --now as milliseconds since the Unix epoch",
            ),
            ComputeError::InvalidOffset(_) => (
                "INVALID_OFFSET",
                "Pass --offset-minutes between -1439 and 1439",
            ),
        };

        CliError {
            code: code.to_string(),
            message: e.to_string(),
            hint: Some(hint.to_string()),
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_entries: usize,
    valid_entries: usize,
    invalid_entries: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    entry_id: Option<String>,
    error: String,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
