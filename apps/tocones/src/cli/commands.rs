//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::AppConfig;
use crate::console::Console;
use crate::platform::DesktopPlatform;
use std::path::PathBuf;
use tocones_core::{PersonnelRole, ToconesError, calculate_age, calculate_ratios};

fn print_json(value: &serde_json::Value) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Start the interactive evaluation on stdin/stdout.
pub fn cmd_run(config: AppConfig, output_dir: Option<PathBuf>) -> Result<(), ToconesError> {
    let platform = DesktopPlatform::new(output_dir);
    let stdin = std::io::stdin();
    let mut console = Console::new(stdin.lock(), std::io::stdout(), platform, config.roster);
    console.run()
}

// =============================================================================
// AGE COMMAND
// =============================================================================

/// Print the plantation age between two dates.
pub fn cmd_age(planting: &str, evaluation: &str, json_mode: bool) -> Result<(), ToconesError> {
    let age = calculate_age(planting, evaluation)?;

    if json_mode {
        print_json(&serde_json::json!({
            "planting": planting.trim(),
            "evaluation": evaluation.trim(),
            "age": age.to_string(),
            "age_tenths": age.tenths()
        }));
        return Ok(());
    }

    println!("Edad: {} años", age);
    Ok(())
}

// =============================================================================
// RATIOS COMMAND
// =============================================================================

/// Print the three cut ratios of one stump.
pub fn cmd_ratios(
    diameter: &str,
    ct: &str,
    cd: &str,
    ab: &str,
    json_mode: bool,
) -> Result<(), ToconesError> {
    let ratios = calculate_ratios(diameter, ct, cd, ab)?;

    if json_mode {
        let entry = |r: &tocones_core::Ratio| {
            serde_json::json!({
                "percent": r.percent,
                "pass": r.pass,
                "display": r.to_string()
            })
        };
        print_json(&serde_json::json!({
            "ct": entry(&ratios.ct),
            "cd": entry(&ratios.cd),
            "ab": entry(&ratios.ab),
            "all_pass": ratios.all_pass()
        }));
        return Ok(());
    }

    println!("CT/d*100: {}", ratios.ct);
    println!("CD/d*100: {}", ratios.cd);
    println!("AB/d*100: {}", ratios.ab);
    Ok(())
}

// =============================================================================
// ROSTER COMMAND
// =============================================================================

/// Print the personnel lists in picker order.
pub fn cmd_roster(config: &AppConfig, json_mode: bool) -> Result<(), ToconesError> {
    let roster = &config.roster;

    if json_mode {
        print_json(&serde_json::json!({
            "supervisors": roster.supervisors,
            "evaluators": roster.evaluators,
            "chainsaw_operators": roster.chainsaw_operators
        }));
        return Ok(());
    }

    for role in [
        PersonnelRole::Supervisor,
        PersonnelRole::Evaluator,
        PersonnelRole::ChainsawOperator,
    ] {
        println!("{}:", role);
        for (n, name) in roster.names(role).iter().enumerate() {
            println!("  {}. {}", n + 1, name);
        }
    }
    Ok(())
}
