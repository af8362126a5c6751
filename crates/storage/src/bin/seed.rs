use std::fmt;

use chrono::{DateTime, Duration, Utc};
use climb_core::model::{RouteAttempt, SessionDraft, UserId};
use storage::repository::{NewSessionRecord, Storage};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    user_id: UserId,
    sessions: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidUserId { raw: String },
    InvalidSessions { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidUserId { raw } => write!(f, "invalid --user value: {raw}"),
            ArgsError::InvalidSessions { raw } => write!(f, "invalid --sessions value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
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

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("CLIMB_DB_URL").unwrap_or_else(|_| "sqlite:dev.sqlite3".into());
        let mut user_id = std::env::var("CLIMB_USER_ID")
            .ok()
            .and_then(|value| value.parse::<UserId>().ok())
            .unwrap_or_else(UserId::random);
        let mut sessions = std::env::var("CLIMB_SEED_SESSIONS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(12);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--user" => {
                    let value = require_value(&mut args, "--user")?;
                    user_id = value
                        .parse()
                        .map_err(|_| ArgsError::InvalidUserId { raw: value.clone() })?;
                }
                "--sessions" => {
                    let value = require_value(&mut args, "--sessions")?;
                    sessions = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidSessions { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            user_id,
            sessions,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:dev.sqlite3)");
    eprintln!("  --user <uuid>             Owner of the seeded sessions (default: random)");
    eprintln!("  --sessions <n>            Number of sessions to insert (default: 12)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  CLIMB_DB_URL, CLIMB_USER_ID, CLIMB_SEED_SESSIONS");
}

const LOCATIONS: [&str; 3] = ["Boulders Sydhavn", "Blocs & Walls", "Beta Boulders"];
const COLORS: [&str; 6] = ["Gul", "Grøn", "Blå", "Lilla", "Rød", "Sort"];
const EXERCISES: [&str; 3] = ["Pull-ups: 10 reps", "Dips: 12 reps", "Hangboard 7/3"];

fn sample_draft(index: u32, now: DateTime<Utc>) -> SessionDraft {
    let i = index as usize;
    let date = (now - Duration::days(i64::from(index) * 5)).date_naive();
    let mut draft = SessionDraft::new(date);
    draft.location = LOCATIONS[i % LOCATIONS.len()].to_string();
    draft.duration = format!("{}t {}m", 1 + index % 2, (index * 15) % 60);
    draft.exercises = EXERCISES
        .iter()
        .take(1 + i % EXERCISES.len())
        .map(ToString::to_string)
        .collect();
    draft.routes = (0..3 + i % 4)
        .map(|n| {
            let label = COLORS[(i + n) % COLORS.len()];
            let note = if n % 3 == 2 { "fejl" } else { "" };
            RouteAttempt::colored(label)
                .with_number((n + 1).to_string())
                .with_attempts(u32::try_from(1 + n % 3).unwrap_or(1))
                .with_note(note)
        })
        .collect();
    draft
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let now = args.now.unwrap_or_else(Utc::now);

    for index in 0..args.sessions {
        let details = sample_draft(index, now).validate()?;
        let id = storage
            .sessions
            .insert_session(NewSessionRecord::new(args.user_id, details))
            .await?;
        tracing::debug!(session_id = %id, "seeded session");
    }

    println!(
        "Seeded {} sessions for user {} into {}",
        args.sessions, args.user_id, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
