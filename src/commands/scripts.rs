//! `scripts`: turn a transcript into forward/rollback migration files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::emit::{emit_all, EmitOptions, EmitSummary};
use crate::report::read_report;

/// Parse `report` and write a script pair per view under `out_dir`.
///
/// Per-view failures are collected in the summary, never fatal here.
pub fn generate_scripts(report: &Path, out_dir: &Path, options: &EmitOptions) -> Result<EmitSummary> {
    println!(
        "{} {}",
        "→ Reading report:".cyan(),
        report.display().to_string().yellow()
    );
    let records = read_report(report)?;

    if records.is_empty() {
        println!("{}", "No views found in report".yellow());
        return Ok(EmitSummary::default());
    }
    println!("  Found {} views", records.len());

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let summary = emit_all(&records, out_dir, options);

    for (name, paths) in &summary.written {
        println!("  {} {}", "✓".green(), name);
        for path in paths {
            println!("      {}", path.display().to_string().dimmed());
        }
    }
    for name in &summary.empty {
        println!(
            "  {} {} had no captured SQL, placeholder written",
            "!".yellow(),
            name
        );
    }
    for failure in &summary.failures {
        println!("  {} {}", "✗".red(), failure);
    }

    println!();
    println!(
        "{} Generated {} script pairs in {}",
        "✓".green(),
        summary.written.len(),
        out_dir.display().to_string().cyan()
    );

    Ok(summary)
}
