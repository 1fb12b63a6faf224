//! Miq CLI - Microscopy image focus-quality scoring tool.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::{Cli, Commands, ExitCode};

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = match cli.command {
        Some(Commands::Predict(ref args)) => run_predict(args),
        None => {
            // Default behavior: run predict with flattened args
            if cli.predict.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            run_predict(&cli.predict)
        }
    };

    exit_code.into()
}

fn run_predict(args: &commands::predict::PredictArgs) -> ExitCode {
    let config = config::AppConfig::load();
    let args = commands::predict::PredictArgs::with_config(args.clone(), &config);
    match commands::predict::run(&args) {
        Ok(result) => result.exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
