//! CLI command definitions and handlers.

pub mod predict;

use clap::{Parser, Subcommand};

/// Miq - Microscopy image focus-quality scoring
#[derive(Parser)]
#[command(name = "miq")]
#[command(author, version, long_about = None)]
pub struct Cli {
    /// Shared predict arguments (paths, model options, output flags).
    #[command(flatten)]
    pub predict: predict::PredictArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Score images for focus quality
    Predict(predict::PredictArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// All images scored, none below the failure threshold.
    Success,
    /// Operational error.
    Error,
    /// `--fail-below` was set and at least one image fell below it.
    BelowThreshold,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        match code {
            ExitCode::Success => Self::from(0),
            ExitCode::Error => Self::from(1),
            ExitCode::BelowThreshold => Self::from(2),
        }
    }
}
