//! services/client/src/bin/phishquiz.rs

use std::sync::Arc;

use chrono::Local;
use clap::{Parser, Subcommand};
use client_lib::{
    app::{
        admin_page, auth_page, forum_page, profile_page, quiz_page, AppState, SessionStore,
        TerminalConsole,
    },
    config::{parse_base_url, Config},
    error::ClientError,
};
use phishing_quiz_core::calendar::CalendarMonth;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "phishquiz", about = "Daily phishing-awareness quiz", version)]
struct Cli {
    /// Backend base URL, including the `/api` prefix.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Login,
    Register,
    Logout,
    /// Shows who the stored session belongs to.
    Whoami,
    /// Takes today's quiz.
    Quiz,
    Leaderboard {
        #[arg(long)]
        limit: Option<u32>,
    },
    Profile,
    #[command(subcommand)]
    Forum(ForumCommand),
    #[command(subcommand)]
    Admin(AdminCommand),
}

#[derive(Subcommand)]
enum ForumCommand {
    List {
        #[arg(long, default_value_t = 20)]
        page_size: u32,
        /// Only the newest posts, with shortened bodies.
        #[arg(long)]
        cards: bool,
    },
    Post,
    Delete {
        id: Uuid,
    },
}

#[derive(Subcommand)]
enum AdminCommand {
    Calendar {
        /// Month to open, as YYYY-MM.
        #[arg(long, value_parser = parse_month)]
        month: Option<CalendarMonth>,
    },
    Edit {
        #[arg(long, value_parser = parse_day)]
        date: chrono::NaiveDate,
    },
    Delete {
        #[arg(long, value_parser = parse_day)]
        date: chrono::NaiveDate,
    },
}

fn parse_month(raw: &str) -> Result<CalendarMonth, String> {
    CalendarMonth::parse(raw).ok_or_else(|| format!("'{}' is not a YYYY-MM month", raw))
}

fn parse_day(raw: &str) -> Result<chrono::NaiveDate, String> {
    admin_page::parse_date(raw).ok_or_else(|| format!("'{}' is not a YYYY-MM-DD date", raw))
}

#[tokio::main]
async fn main() -> Result<(), ClientError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config.api_base_url = parse_base_url("--api-url", url)?;
    }
    let config = Arc::new(config);

    // Logs go to stderr so they never mix with page output.
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
    info!(api = %config.api_base_url, "Configuration loaded.");

    // --- 2. Restore the Session & Wire the Adapters ---
    let store = SessionStore::new(config.session_file.clone());
    let session = store.load()?;
    let state = AppState::connect(config.clone(), session)?;
    let mut console = TerminalConsole::new();

    // --- 3. Dispatch ---
    match cli.command {
        Command::Login => {
            auth_page::login(&state, &mut console, &store).await?;
        }
        Command::Register => {
            auth_page::register(&state, &mut console, &store).await?;
        }
        Command::Logout => {
            auth_page::logout(&state, &store).await?;
            println!("Logged out.");
        }
        Command::Whoami => println!("{}", auth_page::describe(&state.session)),
        Command::Quiz => {
            let summary = quiz_page::run(&state, &mut console).await?;
            info!(answered = summary.answered, correct = summary.correct, "Quiz closed.");
        }
        Command::Leaderboard { limit } => {
            let limit = limit.unwrap_or(config.leaderboard_limit);
            println!("{}", profile_page::show_leaderboard(&state, limit).await?);
        }
        Command::Profile => println!("{}", profile_page::show_profile(&state).await?),
        Command::Forum(ForumCommand::List { page_size, cards }) => {
            println!("{}", forum_page::list(&state, page_size, cards).await?);
        }
        Command::Forum(ForumCommand::Post) => {
            forum_page::post(&state, &mut console).await?;
        }
        Command::Forum(ForumCommand::Delete { id }) => {
            forum_page::delete(&state, &mut console, id).await?;
        }
        Command::Admin(AdminCommand::Calendar { month }) => {
            let today = Local::now().date_naive();
            admin_page::calendar(&state, &mut console, month, today).await?;
        }
        Command::Admin(AdminCommand::Edit { date }) => {
            admin_page::author(&state, &mut console, date).await?;
        }
        Command::Admin(AdminCommand::Delete { date }) => {
            admin_page::delete(&state, &mut console, date).await?;
        }
    }

    Ok(())
}
