//! Main CLI application structure

use std::fs;

use anyhow::Result;
use clap::{Parser, Subcommand};
use directories::ProjectDirs;

use super::output::{Output, OutputFormat};
use super::{task, tui};
use crate::config::Config;
use crate::remote::HttpTaskStore;

#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about = "Terminal client for a shared task roster")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Base URL of the remote task store
    #[arg(long, global = true, env = "ROSTER_BASE_URL")]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks in display order
    List,

    /// Add a task
    Add {
        /// Task name
        name: String,

        /// Cost (a number greater than zero)
        #[arg(long)]
        cost: String,

        /// Due date (yyyy-mm-dd or dd/mm/yyyy)
        #[arg(long = "due")]
        due_date: String,
    },

    /// Edit a task's fields
    Edit {
        /// Task id
        id: u64,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New cost
        #[arg(long)]
        cost: Option<String>,

        /// New due date (yyyy-mm-dd or dd/mm/yyyy)
        #[arg(long = "due")]
        due_date: Option<String>,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: u64,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Move a task from one position to another (1-based)
    Move {
        /// Current position
        from: usize,

        /// New position
        to: usize,
    },

    /// Open the interactive board
    Board,
}

/// Parse arguments and execute the selected command
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let output = Output::new(cli.format, cli.verbose);
    let config = Config::load()?;
    let base_url = cli
        .base_url
        .clone()
        .unwrap_or_else(|| config.base_url.clone());
    output.verbose(&format!("Remote task store: {}", base_url));
    let store = HttpTaskStore::new(&base_url, config.timeout());

    match cli.command {
        Commands::List => task::list(&output, store),
        Commands::Add {
            name,
            cost,
            due_date,
        } => task::add(&output, store, &name, &cost, &due_date),
        Commands::Edit {
            id,
            name,
            cost,
            due_date,
        } => task::edit(
            &output,
            store,
            id,
            name.as_deref(),
            cost.as_deref(),
            due_date.as_deref(),
        ),
        Commands::Rm { id, yes } => task::remove(&output, store, id, yes),
        Commands::Move { from, to } => task::move_position(&output, store, from, to),
        Commands::Board => tui::run(&output, store),
    }
}

/// RUST_LOG-controlled diagnostics, written to a file under the
/// platform data dir so the TUI's alternate screen stays clean
fn setup_logging() {
    let Some(dirs) = ProjectDirs::from("", "", "roster") else {
        return;
    };
    let log_dir = dirs.data_local_dir().join("logs");
    if fs::create_dir_all(&log_dir).is_err() {
        return;
    }
    let Ok(target) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("roster.log"))
    else {
        return;
    };

    let _ = env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(target)))
        .try_init();
}
