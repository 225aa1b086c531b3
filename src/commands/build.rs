//! Build command
//!
//! Composes every persona into a rendered document, writes one file per
//! persona (plus the optional roster), and prints a per-persona pass/fail
//! list with a final tally. Exits nonzero if any persona failed.

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::compose::Compositor;
use crate::config::Config;
use crate::store::FsStore;

pub fn run(template: Option<&str>, output: Option<PathBuf>, global: bool, config: &Config) -> Result<()> {
    let store = FsStore::from_config(config);
    let compositor = Compositor::new(&store);

    let template_name = template.unwrap_or(&config.default_template);
    let output_dir = output.unwrap_or_else(|| Config::expand_path(&config.paths.output));

    let report = compositor
        .compose_all(template_name)
        .context("Failed to compose personas")?;

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    for (name, document) in &report.documents {
        let path = output_dir.join(format!("{name}.md"));
        fs::write(&path, document).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  {} {}", "✓".green(), name.bold());
    }

    for (name, error) in &report.failures {
        println!("  {} {} {}", "✗".red(), name.bold(), error.to_string().dimmed());
    }

    if global {
        let roster = compositor.compose_global().context("Failed to compose roster")?;
        let path = output_dir.join("roster.md");
        fs::write(&path, roster).with_context(|| format!("Failed to write {}", path.display()))?;
        println!("  {} {}", "✓".green(), "roster".bold());
    }

    println!();
    println!(
        "Build complete: {} succeeded, {} failed",
        report.succeeded().to_string().green(),
        report.failed().to_string().red()
    );
    println!("Output directory: {}", output_dir.display());

    if !report.all_passed() {
        eyre::bail!("{} persona(s) failed to compose", report.failed());
    }

    Ok(())
}
