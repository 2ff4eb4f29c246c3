//! habitflow - habit tracker CLI
//!
//! Manage habits, mark them done, and see streaks and completion rates.

mod report;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use habitflow_core::analytics::DashboardStats;
use habitflow_core::{calendar, Config, Database, Frequency, HabitSession, HabitUpdate, NewHabit};

use crate::report::{HabitView, OutputFormat};

#[derive(Parser, Debug)]
#[command(name = "habitflow")]
#[command(about = "Track habits, streaks and completion rates")]
#[command(version)]
struct Args {
    /// Output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a habit
    Add {
        /// Habit name
        name: String,
        #[command(flatten)]
        schedule: ScheduleArgs,
        /// Display color
        #[arg(long, default_value = "#4CAF50")]
        color: String,
        /// Display icon
        #[arg(long, default_value = "check")]
        icon: String,
        /// Reminder time (HH:MM)
        #[arg(long)]
        reminder: Option<String>,
    },
    /// Change a habit
    Edit {
        /// Habit id, id prefix or name
        habit: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        schedule: ScheduleArgs,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        reminder: Option<String>,
        /// Remove the reminder
        #[arg(long, conflicts_with = "reminder")]
        no_reminder: bool,
    },
    /// Delete a habit and its history
    Remove {
        /// Habit id, id prefix or name
        habit: String,
    },
    /// List all habits
    List,
    /// Mark a habit done, or undo it
    Toggle {
        /// Habit id, id prefix or name
        habit: String,
        /// Day to toggle (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the habits due on a day and which are done
    Today {
        /// Day to show (default: today)
        #[arg(long)]
        date: Option<String>,
    },
    /// Day-by-day progress across all habits for a month
    Calendar {
        /// Month to show, YYYY-MM (default: the month of today)
        #[arg(long)]
        month: Option<String>,
    },
    /// Detailed report for one habit
    Show {
        /// Habit id, id prefix or name
        habit: String,
        #[arg(long, value_enum, default_value = "weekly")]
        view: HabitView,
    },
    /// Overall statistics across habits
    Stats {
        /// Completion-rate window in days (default from config)
        #[arg(long)]
        window: Option<u32>,
    },
}

#[derive(ClapArgs, Debug)]
struct ScheduleArgs {
    /// Schedule
    #[arg(long, value_enum)]
    frequency: Option<FrequencyArg>,
    /// Weekdays for a custom schedule, e.g. "sun,wed" (implies --frequency custom)
    #[arg(long, value_delimiter = ',')]
    days: Option<Vec<String>>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum FrequencyArg {
    Daily,
    Weekdays,
    Weekends,
    Custom,
}

impl From<FrequencyArg> for Frequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Daily => Frequency::Daily,
            FrequencyArg::Weekdays => Frequency::Weekdays,
            FrequencyArg::Weekends => Frequency::Weekends,
            FrequencyArg::Custom => Frequency::Custom,
        }
    }
}

impl ScheduleArgs {
    /// Resolve to (frequency, custom days); `--days` alone means custom.
    fn resolve(&self) -> Result<(Option<Frequency>, Option<Vec<u8>>)> {
        let days = self.days.as_ref().map(|d| parse_days(d)).transpose()?;
        let frequency = match (self.frequency, &days) {
            (Some(f), _) => Some(Frequency::from(f)),
            (None, Some(_)) => Some(Frequency::Custom),
            (None, None) => None,
        };
        Ok((frequency, days))
    }
}

fn parse_days(days: &[String]) -> Result<Vec<u8>> {
    days.iter()
        .filter(|d| !d.trim().is_empty())
        .map(|d| {
            calendar::parse_weekday(d)
                .ok_or_else(|| anyhow::anyhow!("Invalid weekday '{}'. Use sun, mon, ... or 0-6", d))
        })
        .collect()
}

fn parse_day_arg(value: Option<&str>, today: NaiveDate) -> Result<NaiveDate> {
    match value {
        Some(s) => Ok(calendar::parse_date(s)?),
        None => Ok(today),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        habitflow_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let today = match &args.today {
        Some(s) => calendar::parse_date(s).context("invalid --today")?,
        None => calendar::today(),
    };

    let db_path = config.resolved_database_path();
    tracing::info!(path = %db_path.display(), "Opening database");
    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let mut session = HabitSession::open(db).context("failed to load habits")?;

    run(&args, &config, &mut session, today)
}

fn run(
    args: &Args,
    config: &Config,
    session: &mut HabitSession<Database>,
    today: NaiveDate,
) -> Result<()> {
    let format = args.format;

    match &args.command {
        Command::Add {
            name,
            schedule,
            color,
            icon,
            reminder,
        } => {
            let (frequency, custom_days) = schedule.resolve()?;
            let new = NewHabit {
                name: name.clone(),
                color: color.clone(),
                icon: icon.clone(),
                frequency: frequency.unwrap_or_default(),
                custom_days,
                reminder: reminder.clone(),
            };
            let habit = session.add_habit(new).context("failed to add habit")?;
            report::print_habit_saved("Added", &habit, format)?;
        }
        Command::Edit {
            habit,
            name,
            schedule,
            color,
            icon,
            reminder,
            no_reminder,
        } => {
            let id = session.lookup(habit)?.id.clone();
            let (frequency, custom_days) = schedule.resolve()?;
            let update = HabitUpdate {
                name: name.clone(),
                color: color.clone(),
                icon: icon.clone(),
                frequency,
                custom_days,
                reminder: if *no_reminder {
                    Some(None)
                } else {
                    reminder.clone().map(Some)
                },
            };
            if update.is_empty() {
                anyhow::bail!("Nothing to change. See `habitflow edit --help`");
            }
            let habit = session
                .update_habit(&id, update)
                .context("failed to update habit")?;
            report::print_habit_saved("Updated", &habit, format)?;
        }
        Command::Remove { habit } => {
            let id = session.lookup(habit)?.id.clone();
            let removed = session.delete_habit(&id).context("failed to remove habit")?;
            report::print_habit_saved("Removed", &removed, format)?;
        }
        Command::List => {
            report::print_list(session.snapshot(), today, format)?;
        }
        Command::Toggle { habit, date } => {
            let date = parse_day_arg(date.as_deref(), today)?;
            let id = session.lookup(habit)?.id.clone();
            let done = session
                .toggle_completion(&id, date)
                .context("failed to toggle completion")?;
            report::print_toggle(session.snapshot(), &id, date, done, today, format)?;
        }
        Command::Today { date } => {
            let date = parse_day_arg(date.as_deref(), today)?;
            report::print_day(session.snapshot(), date, format)?;
        }
        Command::Calendar { month } => {
            let (year, month) = match month {
                Some(s) => calendar::parse_month(s).context("invalid --month")?,
                None => (today.year(), today.month()),
            };
            report::print_month(session.snapshot(), year, month, format)?;
        }
        Command::Show { habit, view } => {
            let habit = session.lookup(habit)?;
            report::print_habit_detail(session.snapshot(), habit, *view, today, format)?;
        }
        Command::Stats { window } => {
            let window = window.unwrap_or(config.analytics.default_window_days);
            if window == 0 {
                anyhow::bail!("--window must be at least 1");
            }
            let stats = DashboardStats::compute(session.snapshot(), today, window);
            report::print_stats(&stats, format)?;
        }
    }

    Ok(())
}
