//! familia CLI: the family Spanish vocabulary trainer.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use familia_core::content::ContentKind;

mod commands;

#[derive(Parser)]
#[command(name = "familia", version, about = "Family Spanish vocabulary trainer")]
struct Cli {
    /// Directory holding the stored data (overrides config)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and seed the built-in content
    Init,

    /// Show learning stats
    Stats {
        /// Day to show (YYYY-MM-DD), default today
        #[arg(long)]
        date: Option<String>,

        /// Show every recorded day
        #[arg(long)]
        history: bool,
    },

    /// Record activity for today
    Record {
        #[command(subcommand)]
        what: RecordCommand,
    },

    /// Toggle a word as known today (e.g. "Colors_0", "phrases_Morning_1")
    Check { id: String },

    /// List categories
    Categories {
        /// vocabulary or phrases
        #[arg(long, default_value = "vocabulary")]
        kind: ContentKind,
    },

    /// Show the entries of one category
    Show {
        category: String,

        #[arg(long, default_value = "vocabulary")]
        kind: ContentKind,
    },

    /// Export a category as CSV
    Export {
        category: String,

        #[arg(long, default_value = "vocabulary")]
        kind: ContentKind,

        /// Output file or directory (default: stdout)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Include the kind and today's date in the file name
        #[arg(long)]
        dated: bool,
    },

    /// Replace a category with the rows of a CSV file
    Import {
        category: String,

        /// CSV file to read
        file: PathBuf,

        #[arg(long, default_value = "vocabulary")]
        kind: ContentKind,
    },

    /// Take a multiple-choice quiz (answers read from stdin)
    Quiz {
        #[arg(long, default_value = "vocabulary")]
        kind: ContentKind,

        /// Number of questions (default from config)
        #[arg(long)]
        count: Option<usize>,

        /// Seed for a repeatable quiz
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Review flashcards (y/n read from stdin)
    Flashcards {
        /// Number of cards (default from config)
        #[arg(long)]
        count: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show today's word
    WordOfDay,

    /// Normalize stored stats records
    Repair,

    /// Chat with a local LLM
    Chat {
        #[command(subcommand)]
        action: ChatCommand,
    },

    /// Show or set the display theme
    Theme {
        /// dark or light
        value: Option<String>,
    },
}

#[derive(Subcommand)]
enum RecordCommand {
    /// Add reward stars
    Stars { count: u64 },
    /// Add explored words
    Words { count: u64 },
    /// Append a quiz grade such as 4/5
    Grade { grade: String },
}

#[derive(Subcommand)]
enum ChatCommand {
    /// Send one message and print the reply
    Send { message: String },
    /// Show or change the chat endpoint and model
    Config {
        #[arg(long)]
        endpoint: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("familia=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(cli.data_dir, cli.config),
        command => match commands::App::open(cli.data_dir, cli.config.as_deref()) {
            Ok(app) => run(&app, command).await,
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(app: &commands::App, command: Commands) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    match command {
        Commands::Init => Ok(()),
        Commands::Stats { date, history } => commands::stats::execute(app, date, history),
        Commands::Record { what } => match what {
            RecordCommand::Stars { count } => commands::record::stars(app, count),
            RecordCommand::Words { count } => commands::record::words(app, count),
            RecordCommand::Grade { grade } => commands::record::grade(app, &grade),
        },
        Commands::Check { id } => commands::check::execute(app, &id),
        Commands::Categories { kind } => commands::content::categories(app, kind),
        Commands::Show { category, kind } => commands::content::show(app, kind, &category),
        Commands::Export {
            category,
            kind,
            output,
            dated,
        } => commands::transfer::export(app, kind, &category, output, dated),
        Commands::Import {
            category,
            file,
            kind,
        } => commands::transfer::import(app, kind, &category, &file),
        Commands::Quiz { kind, count, seed } => {
            commands::quiz::quiz(app, kind, count, seed, &mut stdin.lock())
        }
        Commands::Flashcards { count, seed } => {
            commands::quiz::flashcards(app, count, seed, &mut stdin.lock())
        }
        Commands::WordOfDay => commands::content::word_of_day(app),
        Commands::Repair => commands::stats::repair(app),
        Commands::Chat { action } => match action {
            ChatCommand::Send { message } => commands::chat::send(app, &message).await,
            ChatCommand::Config { endpoint, model } => {
                commands::chat::config(app, endpoint.as_deref(), model.as_deref())
            }
        },
        Commands::Theme { value } => commands::theme::execute(app, value.as_deref()),
    }
}
