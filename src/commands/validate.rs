//! Validate command
//!
//! Resolves every persona without rendering and reports a pass/fail list.
//! Exit 0 only when every persona resolves.

use colored::*;
use eyre::{Context, Result};

use crate::compose::Compositor;
use crate::config::Config;
use crate::store::FsStore;

pub fn run(config: &Config) -> Result<()> {
    let store = FsStore::from_config(config);
    let compositor = Compositor::new(&store);

    let report = compositor.validate_all().context("Failed to validate personas")?;

    for name in &report.passed {
        println!("  {} {}", "✓".green(), name.bold());
    }

    for (name, error) in &report.failures {
        println!("  {} {} {}", "✗".red(), name.bold(), error.to_string().dimmed());
    }

    println!();
    println!(
        "Validation: {} passed, {} failed",
        report.succeeded().to_string().green(),
        report.failed().to_string().red()
    );

    if let Some(err) = report.into_validation_error() {
        return Err(err.into());
    }

    Ok(())
}
