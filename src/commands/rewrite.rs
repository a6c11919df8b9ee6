//! `rewrite`: offline ALTER + rollback for a single CREATE VIEW statement.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use colored::*;

use crate::ddl::{decompose, Algorithm};
use crate::emit::{format_sql, rollback_statement};
use crate::error::DefinerError;

/// Read DDL from `input` (stdin when `None`) and print the formatted forward
/// and rollback statements.
pub fn rewrite_ddl(
    input: Option<&Path>,
    schema: &str,
    view: &str,
    algorithm: Algorithm,
) -> Result<()> {
    let ddl = match input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read DDL from stdin")?;
            buf
        }
    };

    let parsed = decompose(ddl.trim()).map_err(|e| DefinerError::object(schema, view, e))?;
    let forward = parsed.compose(schema, view, algorithm);

    println!("{}", "-- Forward".green());
    println!("{}", format_sql(&forward));
    println!();
    println!("{}", "-- Rollback".yellow());
    println!("{}", format_sql(&rollback_statement(&forward)));

    if algorithm != Algorithm::Merge {
        eprintln!(
            "{} rollback only restores UNDEFINED when the forward algorithm is MERGE",
            "note:".dimmed()
        );
    }
    Ok(())
}
