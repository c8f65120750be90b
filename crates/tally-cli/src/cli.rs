use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use anyhow::{Context, anyhow};
use clap::{ArgAction, Parser, Subcommand};
use tally_shared::{PriorityFilter, StatusFilter, TaskPriority};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tally",
    version,
    about = "Tally: terminal client for the task service"
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    /// Config file (defaults to `<config dir>/tally/config.toml`).
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the session token.
    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Base URL of the task service.
    #[arg(long = "api-base", global = true)]
    pub api_base: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Create an account.
    Signup {
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session token.
    Logout,
    /// Show tasks, highest priority first.
    List {
        #[arg(long, default_value = "all", value_parser = parse_status_filter)]
        status: StatusFilter,
        #[arg(long, default_value = "all", value_parser = parse_priority_filter)]
        priority: PriorityFilter,
    },
    /// Add a pending, medium-priority task.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Delete a task.
    #[command(alias = "rm")]
    Remove { id: String },
    /// Flip a task between pending and completed.
    Toggle { id: String },
    /// Change a task's priority.
    Priority { id: String, level: TaskPriority },
    /// Replace a task's text.
    Edit {
        id: String,
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
}

fn parse_status_filter(s: &str) -> Result<StatusFilter, String> {
    StatusFilter::parse_key(s)
}

fn parse_priority_filter(s: &str) -> Result<PriorityFilter, String> {
    PriorityFilter::parse_key(s)
}

/// Log level implied by the `-v`/`-q` counts; `-q` wins over `-v`.
fn default_level(verbose: u8, quiet: u8) -> LevelFilter {
    match (quiet, verbose) {
        (2.., _) => LevelFilter::ERROR,
        (1, _) | (0, 0) => LevelFilter::WARN,
        (0, 1) => LevelFilter::INFO,
        (0, 2) => LevelFilter::DEBUG,
        (0, _) => LevelFilter::TRACE,
    }
}

/// Installs the stderr subscriber. `RUST_LOG` takes precedence over the flags.
pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(verbose, quiet).into())
        .from_env()
        .context("invalid RUST_LOG filter")?;

    let stderr_is_terminal = io::stderr().is_terminal();
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(stderr_is_terminal)
        .try_init()
    {
        debug!(error = %err, "subscriber already installed");
    }
    Ok(())
}

/// Fills in a missing `--password` by reading one line from stdin.
pub fn resolve_password(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        io::stderr().flush().ok();
    }

    let mut line = String::new();
    stdin
        .lock()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(anyhow!("password cannot be empty"));
    }
    Ok(password)
}
