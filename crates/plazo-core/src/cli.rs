use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "plazo",
    version,
    about = "Plazo: deadline-tracking calendar",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    #[arg(long = "config")]
    pub config: Option<PathBuf>,

    #[arg(long = "data")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Add a task
    Add {
        title: String,

        /// Deadline expression (e.g. 2024-03-15, "2024-03-15 18:30", tomorrow)
        #[arg(long = "due")]
        due: String,

        /// High, Medium or Low
        #[arg(long = "priority", default_value = "medium")]
        priority: String,

        #[arg(long = "description", default_value = "")]
        description: String,
    },

    /// Edit an existing task
    Modify {
        /// Task id (or unique prefix)
        id: String,

        #[arg(long = "title")]
        title: Option<String>,

        #[arg(long = "due")]
        due: Option<String>,

        #[arg(long = "priority")]
        priority: Option<String>,

        #[arg(long = "description")]
        description: Option<String>,

        #[arg(long = "completed")]
        completed: Option<bool>,
    },

    /// Mark a task completed
    Done { id: String },

    /// Remove a task
    Delete { id: String },

    /// List tasks, optionally only those due on one date
    List { date: Option<String> },

    /// Show the month calendar (YYYY-MM, defaults to the current month)
    Cal { month: Option<String> },

    /// One-shot scan for deadlines due within three days
    Due,

    /// Write all tasks to a JSON file
    Export { path: PathBuf },

    /// Replace all tasks from a JSON file
    Import { path: PathBuf },

    /// Run the deadline scanner and autosave in the foreground
    Watch,
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}
