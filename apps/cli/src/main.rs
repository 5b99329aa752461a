mod commands;
mod config_manager;
mod progress;
mod error;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, error};
use anyhow::Result;

use crate::commands::*;
use crate::config_manager::ConfigManager;
use crate::error::{display_error_with_help, CliError};

#[derive(Parser)]
#[command(name = "topdrawer")]
#[command(about = "Classify files against declarative file rules")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify every file below the given roots
    Classify {
        /// Root directories to classify
        roots: Vec<PathBuf>,

        /// Write a JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Profile name to use
        #[arg(short, long)]
        profile: Option<String>,

        /// Also list files no rule matched
        #[arg(long)]
        all: bool,
    },

    /// Inspect and edit the rules of a profile
    Rules {
        #[command(subcommand)]
        action: RulesAction,
    },

    /// Manage configuration profiles
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RulesAction {
    /// List the rules of a profile
    List {
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Decode and index the rules, reporting anything that would be skipped
    Check {
        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Append a rule to a profile
    Add(AddRuleArgs),
}

#[derive(Args)]
struct AddRuleArgs {
    /// Profile to add the rule to
    #[arg(short, long)]
    profile: Option<String>,

    /// Human readable label
    #[arg(short, long)]
    label: Option<String>,

    /// Payload as JSON, handed back for every match
    #[arg(long, default_value = "null")]
    payload: String,

    /// File name without extension
    #[arg(long)]
    name: Option<String>,

    /// File extension
    #[arg(long)]
    ext: Option<String>,

    /// File name including extension
    #[arg(long)]
    full_name: Option<String>,

    /// An ancestor folder with this name
    #[arg(long)]
    in_folder: Option<String>,

    /// Containing folder has a file with this extension
    #[arg(long)]
    parent_has_ext: Option<String>,

    /// Containing folder has no file with this extension
    #[arg(long)]
    parent_lacks_ext: Option<String>,

    /// Containing folder has a subfolder with this name
    #[arg(long)]
    parent_has_folder: Option<String>,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// List available profiles
    List,

    /// Show profile configuration
    Show {
        /// Profile name
        profile: String,
    },

    /// Create new profile
    Create {
        /// Profile name
        profile: String,

        /// Copy from existing profile
        #[arg(long)]
        from: Option<String>,
    },

    /// Delete profile
    Delete {
        /// Profile name
        profile: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    info!("TopDrawer CLI v{} starting", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_manager = ConfigManager::new(cli.config.clone())?;

    // Execute command
    let result = match cli.command {
        Commands::Classify { roots, output, profile, all } => {
            classify_command(roots, output, profile, all, &config_manager)
        }
        Commands::Rules { action } => rules_command(action, &config_manager),
        Commands::Config { action } => config_command(action, &config_manager),
    };

    match result {
        Ok(_) => {
            info!("Command completed successfully");
            Ok(())
        }
        Err(e) => {
            error!("Command failed: {:#}", e);
            match e.downcast_ref::<CliError>() {
                Some(cli_error) => {
                    display_error_with_help(cli_error);
                    std::process::exit(cli_error.error_code());
                }
                None => std::process::exit(1),
            }
        }
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new(format!(
                        "topdrawer={level},topdrawer_matcher={level},topdrawer_scanner={level},topdrawer_types={level}",
                        level = log_level
                    ))
                })
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}
