//! CLI command definitions and handlers.

pub mod models;
pub mod pick;

use clap::{Parser, Subcommand};

/// Photo Pick - Select the best photos from a batch
#[derive(Parser)]
#[command(name = "photo-pick")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared pick arguments (paths, top-n, thresholds).
    #[command(flatten)]
    pub pick: pick::PickArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Score images and select the top N
    Pick(pick::PickArgs),
    /// Manage the emotion model
    Models(models::ModelsArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// The run completed.
    Success,
    /// The run failed (bad parameters, storage failure).
    Error,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::Error => Self::from(1),
        }
    }
}
