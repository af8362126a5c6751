use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use climb_core::model::{ClimbSession, UserId};
use climb_core::stats::{Period, PeriodError, SessionStats, routes_by_wall_height};
use services::{AppServices, Clock};
use tracing_subscriber::EnvFilter;

const DEFAULT_DB_URL: &str = "sqlite://climb.sqlite3";

#[derive(Debug)]
enum ArgsError {
    MissingCommand,
    UnknownCommand(String),
    MissingValue { flag: &'static str },
    MissingFile,
    MissingUser,
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidUserId { raw: String },
    InvalidPeriod(PeriodError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingCommand => write!(f, "missing command"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingFile => write!(f, "import requires a JSON file"),
            ArgsError::MissingUser => {
                write!(f, "no user selected (pass --user or set CLIMB_USER_ID)")
            }
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid user id: {raw}"),
            ArgsError::InvalidPeriod(err) => write!(f, "invalid --period value: {err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Stats { period: Period, json: bool },
    Sessions,
    Import { file: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    db_url: String,
    user_id: UserId,
    command: Command,
}

/// Values read from the environment; flags override them.
#[derive(Debug, Clone, Default)]
struct EnvDefaults {
    db_url: Option<String>,
    user_id: Option<String>,
}

impl EnvDefaults {
    fn from_env() -> Self {
        Self {
            db_url: std::env::var("CLIMB_DB_URL").ok(),
            user_id: std::env::var("CLIMB_USER_ID").ok(),
        }
    }
}

fn parse_user(raw: &str) -> Result<UserId, ArgsError> {
    raw.parse().map_err(|_| ArgsError::InvalidUserId {
        raw: raw.to_string(),
    })
}

impl Args {
    fn parse_from(
        argv: impl IntoIterator<Item = String>,
        env: EnvDefaults,
    ) -> Result<Self, ArgsError> {
        let mut args = argv.into_iter();
        let command_name = args.next().ok_or(ArgsError::MissingCommand)?;

        let mut db_url = env
            .db_url
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.to_string(), normalize_sqlite_url);
        let mut user_raw = env.user_id;
        let mut period = Period::Week;
        let mut json = false;
        let mut file: Option<PathBuf> = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--user" => user_raw = Some(require_value(&mut args, "--user")?),
                "--period" if command_name == "stats" => {
                    let value = require_value(&mut args, "--period")?;
                    period = value.parse().map_err(ArgsError::InvalidPeriod)?;
                }
                "--json" if command_name == "stats" => json = true,
                _ if command_name == "import" && file.is_none() && !arg.starts_with("--") => {
                    file = Some(PathBuf::from(arg));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        let command = match command_name.as_str() {
            "stats" => Command::Stats { period, json },
            "sessions" => Command::Sessions,
            "import" => Command::Import {
                file: file.ok_or(ArgsError::MissingFile)?,
            },
            _ => return Err(ArgsError::UnknownCommand(command_name)),
        };

        let user_id = user_raw
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .ok_or(ArgsError::MissingUser)
            .and_then(parse_user)?;

        Ok(Self {
            db_url,
            user_id,
            command,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- stats    [--period week|month|year] [--json] [options]");
    eprintln!("  cargo run -p app -- sessions [options]");
    eprintln!("  cargo run -p app -- import <export.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL or path (default: {DEFAULT_DB_URL})");
    eprintln!("  --user <uuid>             Whose sessions to use");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  CLIMB_DB_URL, CLIMB_USER_ID, RUST_LOG");
}

fn normalize_sqlite_url(raw: String) -> String {
    let trimmed = raw.trim();
    if trimmed == "sqlite::memory:" || trimmed.starts_with("sqlite://") {
        return trimmed.to_string();
    }

    let path_str = trimmed.strip_prefix("sqlite:").unwrap_or(trimmed);
    let path = std::path::Path::new(path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}?mode=rwc", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn print_stats(stats: &SessionStats, today: NaiveDate) {
    println!(
        "Period: {} ({} to {today})",
        stats.period(),
        stats.cutoff()
    );
    println!("Sessions: {}", stats.session_count());
    println!("Time climbed: {}t {}m", stats.hours(), stats.minutes_remainder());
    println!("Completed routes: {}", stats.total_completed_routes());
    for entry in stats.color_tally().entries() {
        println!("  {}: {}", entry.color.label(), entry.count);
    }
    println!("Exercises:");
    for total in stats.exercise_totals().totals() {
        println!("  {}: {} reps", total.name, total.reps);
    }
}

fn print_session(session: &ClimbSession) {
    let duration = session
        .duration()
        .map_or_else(|| "no duration".to_string(), |d| d.to_string());
    let draft = if session.is_draft() { " [draft]" } else { "" };
    println!(
        "#{} {} {} ({duration}){draft}",
        session.id(),
        session.date(),
        session.location().unwrap_or("-"),
    );
    for exercise in session.exercises() {
        println!("    {}", exercise.text());
    }
    for (height, routes) in routes_by_wall_height(session.routes()) {
        let labels: Vec<String> = routes
            .iter()
            .map(|route| {
                let color = route.color.as_ref().map_or("?", |c| c.label());
                let mark = if route.is_completed() { "" } else { " x" };
                format!("{color}{mark}")
            })
            .collect();
        println!("    {height}m: {}", labels.join(", "));
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    if matches!(argv.first().map(String::as_str), Some("--help" | "-h")) {
        print_usage();
        return Ok(());
    }

    let args = Args::parse_from(argv, EnvDefaults::from_env()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&args.db_url)?;
    let clock = Clock::default_clock();
    let services = AppServices::new_sqlite(&args.db_url, clock).await?;
    tracing::debug!(db = %args.db_url, user_id = %args.user_id, "services ready");

    match args.command {
        Command::Stats { period, json } => {
            let stats = services.stats().overview(args.user_id, period).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats, clock.today());
            }
        }
        Command::Sessions => {
            let sessions = services.session_log().list_sessions(args.user_id).await?;
            if sessions.is_empty() {
                println!("No sessions yet.");
            }
            for session in &sessions {
                print_session(session);
            }
        }
        Command::Import { file } => {
            let json = std::fs::read_to_string(&file)?;
            let count = services.import().import_json(args.user_id, &json).await?;
            println!("Imported {count} sessions from {}", file.display());
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
