//! Binary entry point for scamguard.
//!
//! This binary provides the CLI interface for the scamguard server.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::{Parser, Subcommand};
use scamguard::cli::{cmd_check, cmd_mask, cmd_serve};
use scamguard::config::ScamguardConfig;
use scamguard::observability::{self, InitOptions};
use scamguard::ui::{HttpAnalyzeClient, SubmitOutcome};
use std::path::Path;
use std::process::ExitCode;

/// Environment variable naming the configuration file.
const CONFIG_PATH_ENV: &str = "SCAMGUARD_CONFIG_PATH";

/// Scamguard - masks sensitive data before asking an LLM about scam risk.
#[derive(Parser)]
#[command(name = "scamguard")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true, env = CONFIG_PATH_ENV)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server.
    Serve,

    /// Analyze one message through a running server.
    Check {
        /// The message to analyze.
        text: String,

        /// Base URL of the server.
        #[arg(short, long, default_value = HttpAnalyzeClient::DEFAULT_BASE_URL)]
        url: String,
    },

    /// Mask a message locally and print the result as JSON.
    Mask {
        /// The message to mask.
        text: String,
    },
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Failed to load .env: {e}");
            return ExitCode::FAILURE;
        }
    }

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config.with_env_overrides(),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(
        &config,
        InitOptions {
            verbose: cli.verbose,
        },
    ) {
        eprintln!("Failed to initialize observability: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli.command, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
fn run_command(command: Commands, config: &ScamguardConfig) -> scamguard::Result<ExitCode> {
    match command {
        Commands::Serve => cmd_serve(config).map(|()| ExitCode::SUCCESS),

        Commands::Check { text, url } => match cmd_check(&text, &url)? {
            SubmitOutcome::Rendered => Ok(ExitCode::SUCCESS),
            SubmitOutcome::EmptyInput | SubmitOutcome::Busy | SubmitOutcome::Failed => {
                Ok(ExitCode::FAILURE)
            },
        },

        Commands::Mask { text } => {
            println!("{}", cmd_mask(&text, config.masking_profile)?);
            Ok(ExitCode::SUCCESS)
        },
    }
}

/// Loads configuration from `--config` (or its environment variable), falling
/// back to the default location.
fn load_config(path: Option<&str>) -> scamguard::Result<ScamguardConfig> {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(config_path) => ScamguardConfig::load_from_file(Path::new(config_path)),
        None => Ok(ScamguardConfig::load_default()),
    }
}
