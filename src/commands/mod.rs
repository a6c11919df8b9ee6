//! Command handlers behind the `definer` binary.
//!
//! - `inspect`: databases, definer inventory, `SHOW CREATE` (+ algorithm change)
//! - `dump`: transcript of every view in a schema
//! - `scripts`: transcript -> forward/rollback files
//! - `rewrite`: offline ALTER/rollback for one DDL string

mod dump;
mod inspect;
mod rewrite;
mod scripts;

pub use dump::dump_views;
pub use inspect::{list_databases, list_objects, show_create};
pub use rewrite::rewrite_ddl;
pub use scripts::generate_scripts;

use std::io;

use anyhow::{Context, Result};

use crate::catalog::Catalog;
use crate::credentials::Credentials;
use crate::report::TranscriptWriter;

/// Server to talk to.
#[derive(Clone)]
pub struct Target {
    pub host: String,
    pub port: u16,
    pub database: Option<String>,
    pub credentials: Credentials,
}

impl Target {
    pub async fn connect(&self) -> Result<Catalog> {
        Catalog::connect(
            &self.host,
            self.port,
            self.database.as_deref(),
            &self.credentials,
        )
        .await
        .with_context(|| format!("Failed to connect to {}:{}", self.host, self.port))
    }

    fn require_database(&self) -> Result<&str> {
        self.database
            .as_deref()
            .context("a database (-d) is required for this command")
    }
}

/// Transcript on stdout, colored only when `colored` would color anyway.
fn stdout_transcript() -> TranscriptWriter<io::Stdout> {
    TranscriptWriter::new(io::stdout())
        .with_color(colored::control::SHOULD_COLORIZE.should_colorize())
}
