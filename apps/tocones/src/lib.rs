//! # tocones
//!
//! Terminal front end for the stump evaluation form.
//!
//! - `cli` → argument parsing and one-shot commands
//! - `config` → TOML configuration (roster, output directory)
//! - `console` → the interactive screen flow over stdin/stdout
//! - `platform` → output directory and "open file" capabilities

pub mod cli;
pub mod config;
pub mod console;
pub mod platform;
