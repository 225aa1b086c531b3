//! Migrate command
//!
//! Runs the content-inlining batch utility over every persona record.

use colored::*;
use eyre::{Context, Result};

use crate::config::Config;
use crate::migrate;
use crate::store::FsStore;

pub fn run(dry_run: bool, config: &Config) -> Result<()> {
    let store = FsStore::from_config(config);

    let report = migrate::run(&store, dry_run).context("Migration failed")?;

    for name in &report.rewritten {
        if dry_run {
            println!("  {} {} (would inline content refs)", "●".yellow(), name.bold());
        } else {
            println!("  {} {}", "✓".green(), name.bold());
        }
    }

    for name in &report.skipped {
        println!("  {} {} {}", "-".dimmed(), name, "(nothing to inline)".dimmed());
    }

    for (name, error) in &report.failures {
        println!("  {} {} {}", "✗".red(), name.bold(), error.to_string().dimmed());
    }

    println!();
    if dry_run {
        println!(
            "Dry run complete: {} would be rewritten, {} skipped, {} failed",
            report.rewritten.len(),
            report.skipped.len(),
            report.failures.len()
        );
    } else {
        println!(
            "Migration complete: {} rewritten, {} skipped, {} failed",
            report.rewritten.len(),
            report.skipped.len(),
            report.failures.len()
        );
    }

    if !report.failures.is_empty() {
        eyre::bail!("{} persona(s) failed to migrate", report.failures.len());
    }

    Ok(())
}
