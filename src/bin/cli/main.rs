mod app;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "kioku", about = "Kioku flashcard and review CLI", version)]
struct Cli {
    /// Path to a config file (default: ~/.config/kioku/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "plain")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new flashcard
    Add {
        /// The expression as it appeared on the page
        front: String,
        /// Meaning or translation
        back: String,
        /// Kana reading
        #[arg(long)]
        reading: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List all flashcards
    List,

    /// Delete a flashcard and its schedule
    Remove {
        card_id: Uuid,
    },

    /// Show the cards currently due for review
    Due {
        /// Maximum batch size (default from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Submit a review for a card
    Review {
        card_id: Uuid,
        /// 1=Again, 2=Hard, 3=Good, 4=Easy
        rating: i32,
    },

    /// Show what each rating would do to a card's schedule
    Preview {
        card_id: Uuid,
    },

    /// Show review statistics
    Stats,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let app = app::App::new(cli.config.as_deref(), cli.data_dir)?;

    match cli.command {
        Command::Add {
            front,
            back,
            reading,
            notes,
            tags,
        } => {
            commands::add::run(&app, front, back, reading, notes, tags.as_deref(), &cli.format)?;
        }
        Command::List => {
            commands::list::run(&app, &cli.format)?;
        }
        Command::Remove { card_id } => {
            commands::remove::run(&app, card_id, &cli.format)?;
        }
        Command::Due { limit } => {
            commands::due::run(&app, limit, &cli.format)?;
        }
        Command::Review { card_id, rating } => {
            commands::review::run(&app, card_id, rating, &cli.format)?;
        }
        Command::Preview { card_id } => {
            commands::preview::run(&app, card_id, &cli.format)?;
        }
        Command::Stats => {
            commands::stats::run(&app, &cli.format)?;
        }
    }

    Ok(())
}
