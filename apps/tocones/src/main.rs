//! # Tocones - Stump Evaluation
//!
//! The field binary for the stump harvest-quality evaluation.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                apps/tocones (THE BINARY)              │
//! │                                                      │
//! │  ┌─────────────┐   ┌──────────────┐   ┌───────────┐  │
//! │  │    CLI      │   │   Console    │   │ Platform  │  │
//! │  │   (clap)    │   │ (screens)    │   │ (dirs)    │  │
//! │  └──────┬──────┘   └──────┬───────┘   └─────┬─────┘  │
//! │         └─────────────────┼─────────────────┘        │
//! │                           ▼                          │
//! │                   ┌───────────────┐                  │
//! │                   │ tocones-core  │                  │
//! │                   └───────────────┘                  │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Interactive evaluation
//! tocones --output-dir ./salidas
//!
//! # One-shot calculators
//! tocones age -p 01/01/2020 -e 01/01/2022
//! tocones ratios -d 20 --ct 13 --cd 4.6 --ab 1.8 --json-mode
//! ```

use clap::Parser;
use tocones::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Initialize tracing - TOCONES_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("TOCONES_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tocones=info".into());

    // Screens own stdout; logs go to stderr.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  ████████╗ ██████╗  ██████╗ ██████╗ ███╗   ██╗███████╗███████╗
  ╚══██╔══╝██╔═══██╗██╔════╝██╔═══██╗████╗  ██║██╔════╝██╔════╝
     ██║   ██║   ██║██║     ██║   ██║██╔██╗ ██║█████╗  ███████╗
     ██║   ██║   ██║██║     ██║   ██║██║╚██╗██║██╔══╝  ╚════██║
     ██║   ╚██████╔╝╚██████╗╚██████╔╝██║ ╚████║███████╗███████║
     ╚═╝    ╚═════╝  ╚═════╝ ╚═════╝ ╚═╝  ╚═══╝╚══════╝╚══════╝

  Evaluación de Tocones v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
