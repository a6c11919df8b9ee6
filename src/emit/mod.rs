//! Script emitter: readable SQL layout and Flyway-style forward/rollback files.
//!
//! Layout on disk:
//!
//! ```text
//! <out>/<schema>/V<view>.sql   forward (ALTER VIEW ... ALGORITHM = X)
//! <out>/<schema>/U<view>.sql   rollback (CREATE OR REPLACE ... ALGORITHM = UNDEFINED)
//! ```

mod format;
mod script;

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::ddl::Algorithm;
use crate::error::DefinerError;
use crate::report::ObjectRecord;

pub use format::{format_sql, LINE_BREAK_KEYWORDS};
pub use script::{
    forward_sql, rollback_statement, Script, ScriptKind, ScriptNaming, ScriptPair,
    EMPTY_PLACEHOLDER,
};

/// Options for a batch of records.
#[derive(Debug, Clone, Default)]
pub struct EmitOptions {
    pub naming: ScriptNaming,
    /// Recompose every forward statement for this algorithm.
    pub target: Option<Algorithm>,
    pub overwrite: bool,
}

/// Outcome of [`emit_all`]. A failed object never stops the batch.
#[derive(Debug, Default)]
pub struct EmitSummary {
    /// `(schema.view, [forward, rollback])` for every pair fully written.
    pub written: Vec<(String, Vec<PathBuf>)>,
    /// Views whose pair had no captured SQL (placeholder files).
    pub empty: Vec<String>,
    pub failures: Vec<DefinerError>,
}

impl EmitSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Build and write the script pair of every record under `out_dir`.
pub fn emit_all(records: &[ObjectRecord], out_dir: &Path, options: &EmitOptions) -> EmitSummary {
    let mut summary = EmitSummary::default();

    for record in records {
        let pair = match ScriptPair::for_record(record, options.target, &options.naming) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(view = %record.qualified_name(), error = %e, "skipping view");
                summary.failures.push(e);
                continue;
            }
        };

        if pair.forward.contents.contains(EMPTY_PLACEHOLDER) {
            summary.empty.push(record.qualified_name());
        }

        let mut paths = Vec::with_capacity(2);
        for script in pair.scripts() {
            match script.write_into(out_dir, options.overwrite) {
                Ok(path) => paths.push(path),
                Err(e) => {
                    warn!(view = %record.qualified_name(), error = %e, "write failed");
                    summary.failures.push(e);
                }
            }
        }
        if paths.len() == 2 {
            summary.written.push((record.qualified_name(), paths));
        }
    }

    summary
}
