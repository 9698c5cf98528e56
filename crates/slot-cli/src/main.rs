//! `slots` CLI: preview a coach's bookable slots and check selections from the
//! command line.
//!
//! ## Usage
//!
//! ```sh
//! # Effective availability for a week
//! slots resolve -s coach.json --date 2026-01-12 --to 2026-01-18
//!
//! # Coach-local 30 minute slots on one date, respecting existing bookings
//! slots list -s coach.json -b bookings.json --date 2026-01-13 --duration 30
//!
//! # The same slots as seen by a student in New York, as JSON
//! slots list -s coach.json --date 2026-01-13 --duration 30 --viewer-tz America/New_York --json
//!
//! # Map a student's selection to the booking window, re-checking live bookings
//! slots book --date 2026-01-13 --slot 04:00 --viewer-tz America/New_York --duration 30 -b bookings.json
//!
//! # Convert a wall-clock time between zones
//! slots convert --date 2026-01-13 --time 09:00 --from Europe/London --to Asia/Tokyo
//! ```

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use slot_engine::availability::resolve_range;
use slot_engine::timezone::{convert_wall_clock, parse_date};
use slot_engine::{
    revalidate_selection, CoachSchedule, CommittedBooking, DstPolicy, Offering, SessionLength,
    SlotConfig, SlotQuery, WeeklySchedule,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slots",
    version,
    about = "Coach availability and slot resolution CLI"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log filter used when RUST_LOG is not set (e.g. "debug", "slot_engine=debug")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Increase logging (-v debug, -vv trace); overrides --log-level
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn log_filter(&self) -> &str {
        match self.verbose {
            0 => &self.log_level,
            1 => "debug",
            _ => "trace",
        }
    }
}

/// How candidate starts inside a spring-forward gap are treated.
#[derive(Clone, Copy, ValueEnum)]
enum GapPolicy {
    Skip,
    ShiftForward,
    ShiftBackward,
}

impl From<GapPolicy> for DstPolicy {
    fn from(p: GapPolicy) -> Self {
        match p {
            GapPolicy::Skip => DstPolicy::Skip,
            GapPolicy::ShiftForward => DstPolicy::ShiftForward,
            GapPolicy::ShiftBackward => DstPolicy::ShiftBackward,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the effective availability window per date
    Resolve {
        /// Coach schedule JSON file (timezone, weeklyRules, overrides)
        #[arg(short, long)]
        schedule: String,
        #[command(flatten)]
        dates: DateRange,
    },
    /// List bookable slots
    List {
        /// Coach schedule JSON file (timezone, weeklyRules, overrides)
        #[arg(short, long)]
        schedule: String,
        /// Existing bookings JSON file (array)
        #[arg(short, long)]
        bookings: Option<String>,
        #[command(flatten)]
        dates: DateRange,
        #[command(flatten)]
        session: SessionArgs,
        /// Offering JSON file supplying duration and buffer
        #[arg(long, conflicts_with = "duration")]
        offering: Option<String>,
        /// Show slots in this viewer timezone
        #[arg(long)]
        viewer_tz: Option<String>,
        /// Minutes between candidate start times
        #[arg(long, default_value_t = 30)]
        granularity: u32,
        /// Treatment of starts that fall in a DST gap
        #[arg(long, value_enum, default_value = "skip")]
        dst_policy: GapPolicy,
        /// Ignore this booking id (rescheduling)
        #[arg(long)]
        exclude: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Map a viewer's selection to a booking window and re-check it
    Book {
        /// Viewer-local calendar date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
        /// Viewer-local start time (HH:mm)
        #[arg(long)]
        slot: String,
        /// Viewer timezone
        #[arg(long)]
        viewer_tz: String,
        #[command(flatten)]
        session: SessionArgs,
        /// Live bookings JSON file to re-validate against
        #[arg(short, long)]
        bookings: Option<String>,
        /// Ignore this booking id (rescheduling)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Convert a wall-clock time between timezones
    Convert {
        #[arg(long)]
        date: String,
        #[arg(long)]
        time: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[derive(Args)]
struct DateRange {
    /// First date (YYYY-MM-DD, coach-local)
    #[arg(long)]
    date: String,
    /// Last date, inclusive (defaults to --date)
    #[arg(long)]
    to: Option<String>,
}

impl DateRange {
    fn parse(&self) -> Result<(NaiveDate, NaiveDate)> {
        let from = parse_date(&self.date)?;
        let to = match self.to.as_deref() {
            Some(to) => parse_date(to)?,
            None => from,
        };
        if to < from {
            bail!("--to ({}) is before --date ({})", to, from);
        }
        Ok((from, to))
    }
}

#[derive(Args)]
struct SessionArgs {
    /// Session length in minutes
    #[arg(long)]
    duration: Option<u32>,
    /// Required gap before and after the session, in minutes
    #[arg(long, default_value_t = 0)]
    buffer: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve { schedule, dates } => {
            let schedule: CoachSchedule = read_json(&schedule)?;
            let (from, to) = dates.parse()?;
            let weekly = WeeklySchedule::from_rules(&schedule.weekly_rules);

            for day in resolve_range(from, to, &weekly, &schedule.overrides) {
                match day.window {
                    Some(w) => println!("{} {}-{}", day.date, w.start_time(), w.end_time()),
                    None => println!("{} unavailable", day.date),
                }
            }
        }
        Commands::List {
            schedule,
            bookings,
            dates,
            session,
            offering,
            viewer_tz,
            granularity,
            dst_policy,
            exclude,
            json,
        } => {
            let schedule: CoachSchedule = read_json(&schedule)?;
            let bookings: Vec<CommittedBooking> = match bookings {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let (from, to) = dates.parse()?;

            let Some(session) = resolve_session(&session, offering.as_deref())? else {
                info!("offering is inactive, no slots to list");
                if json {
                    println!("[]");
                }
                return Ok(());
            };

            let mut query = SlotQuery::new(&schedule, &bookings, session)?
                .with_config(
                    SlotConfig::default()
                        .with_granularity(granularity)
                        .with_dst_policy(dst_policy.into()),
                );
            if let Some(id) = exclude.as_deref() {
                query = query.excluding(id);
            }
            debug!(%from, %to, bookings = bookings.len(), "listing slots");

            match viewer_tz.as_deref() {
                Some(tz) => list_for_viewer(&query, from, to, tz, json)?,
                None => list_coach_local(&query, from, to, json)?,
            }
        }
        Commands::Book {
            date,
            slot,
            viewer_tz,
            session,
            bookings,
            exclude,
        } => {
            let date = parse_date(&date)?;
            let duration = session
                .duration
                .context("--duration is required when booking")?;
            let window = slot_engine::localizer::selection_to_booking_window(
                date, &slot, &viewer_tz, duration,
            )?;

            if let Some(path) = bookings {
                let live: Vec<CommittedBooking> = read_json(&path)?;
                revalidate_selection(&window, session.buffer, &live, exclude.as_deref())
                    .context("Selected slot cannot be booked")?;
            }

            println!("{}", serde_json::to_string_pretty(&window)?);
        }
        Commands::Convert {
            date,
            time,
            from,
            to,
        } => {
            let date = parse_date(&date)?;
            let wall = convert_wall_clock(date, &time, &from, &to)?;
            println!("{} {}", wall.date, wall.time);
        }
    }

    Ok(())
}

/// Pick the session length from `--offering` or `--duration`/`--buffer`.
///
/// Returns `None` for an inactive offering.
fn resolve_session(args: &SessionArgs, offering: Option<&str>) -> Result<Option<SessionLength>> {
    if let Some(path) = offering {
        let offering: Offering = read_json(path)?;
        return Ok(offering.session());
    }
    match args.duration {
        Some(duration) => Ok(Some(SessionLength::new(duration, args.buffer))),
        None => bail!("either --duration or --offering is required"),
    }
}

fn list_coach_local(query: &SlotQuery<'_>, from: NaiveDate, to: NaiveDate, json: bool) -> Result<()> {
    let days = query.slots_for_range(from, to);

    if json {
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }
    for day in &days {
        for slot in &day.slots {
            println!("{} {}-{}", day.date, slot.start_time, slot.end_time);
        }
    }
    Ok(())
}

fn list_for_viewer(
    query: &SlotQuery<'_>,
    from: NaiveDate,
    to: NaiveDate,
    viewer_tz: &str,
    json: bool,
) -> Result<()> {
    let mut all = Vec::new();
    for date in from.iter_days().take_while(|d| *d <= to) {
        all.extend(query.slots_for_viewer(date, viewer_tz)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&all)?);
        return Ok(());
    }
    for slot in &all {
        println!(
            "{} {} (coach {})",
            slot.viewer.date, slot.viewer.time, slot.coach_time
        );
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> Result<T> {
    let raw =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse JSON in {}", path))
}
