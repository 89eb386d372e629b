//! # Tocones CLI Module
//!
//! This module implements the command-line interface.
//!
//! ## Available Commands
//!
//! - `run` - Interactive evaluation (default)
//! - `age` - Plantation age between two dates
//! - `ratios` - Cut ratios of one stump
//! - `roster` - Configured personnel lists

mod commands;

use crate::config::AppConfig;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tocones_core::ToconesError;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Tocones - stump harvest-quality evaluation
///
/// Records twelve stump measurements per plot, checks the felling cut
/// ratios and exports the evaluation as a spreadsheet with a QR summary.
#[derive(Parser, Debug)]
#[command(name = "tocones")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for exported files (overrides the configuration)
    #[arg(short, long, global = true)]
    pub output_dir: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the interactive evaluation
    Run,

    /// Compute the plantation age
    Age {
        /// Planting date (dd/mm/yyyy)
        #[arg(short, long)]
        planting: String,

        /// Evaluation date (dd/mm/yyyy)
        #[arg(short, long)]
        evaluation: String,
    },

    /// Compute the cut ratios of one stump
    Ratios {
        /// Stump diameter
        #[arg(short, long)]
        d: String,

        /// Felling cut height
        #[arg(long)]
        ct: String,

        /// Directional cut height
        #[arg(long)]
        cd: String,

        /// Hinge width
        #[arg(long)]
        ab: String,
    },

    /// List the configured personnel
    Roster,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), ToconesError> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Age {
            planting,
            evaluation,
        }) => cmd_age(&planting, &evaluation, json_mode),
        Some(Commands::Ratios { d, ct, cd, ab }) => cmd_ratios(&d, &ct, &cd, &ab, json_mode),
        Some(Commands::Roster) => cmd_roster(&config, json_mode),
        Some(Commands::Run) | None => {
            // No subcommand - start the interactive flow by default
            let output_dir = cli.output_dir.or(config.output.directory.clone());
            cmd_run(config, output_dir)
        }
    }
}
