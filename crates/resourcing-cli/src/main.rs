use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "resourcing", version, about = "Team capacity and overtime planner")]
struct Cli {
    /// Reference date for planning (YYYY-MM-DD, default: local today)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Team members and daily hours
    Team {
        #[command(subcommand)]
        action: commands::team::TeamAction,
    },
    /// Job management
    Job {
        #[command(subcommand)]
        action: commands::job::JobAction,
    },
    /// Member calendars, leave and unavailability
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Scheduled jobs per member
    Schedule {
        /// Only this member
        #[arg(long)]
        member: Option<String>,
    },
    /// Free capacity and next available dates
    Availability {
        #[command(subcommand)]
        action: commands::availability::AvailabilityAction,
    },
    /// Overtime and delivery health
    Health,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Whole-state export and import
    State {
        #[command(subcommand)]
        action: commands::state::StateAction,
    },
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("RESOURCING_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let today = cli.today;
    let result = match cli.command {
        Commands::Team { action } => commands::team::run(action),
        Commands::Job { action } => commands::job::run(action),
        Commands::Calendar { action } => commands::calendar::run(action, today),
        Commands::Schedule { member } => commands::schedule::run(member, today),
        Commands::Availability { action } => commands::availability::run(action, today),
        Commands::Health => commands::health::run(today),
        Commands::Config { action } => commands::config::run(action),
        Commands::State { action } => commands::state::run(action, today),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
