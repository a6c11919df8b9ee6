//! Dumper transcript: parsing it back into records, and writing it.
//!
//! A transcript looks like this:
//!
//! ```text
//! Connected to db-01 (ip-10-0-0-1): ✓
//! Source server: db-01, Database: sales
//!
//! Processing view: v_sales
//! Object: v_sales
//! Type: VIEW
//! Create Statement:
//! --------------------------------------------------------------------------------
//! CREATE ALGORITHM=UNDEFINED DEFINER=`app`@`%` SQL SECURITY DEFINER VIEW `v_sales` AS select 1
//! --------------------------------------------------------------------------------
//! ALTER VIEW Statement:
//! --------------------------------------------------------------------------------
//! ALTER
//!     ALGORITHM = MERGE
//!     ...
//! --------------------------------------------------------------------------------
//! ```
//!
//! # Example
//! ```
//! use definer::report::parse_report_str;
//!
//! let records = parse_report_str(
//!     "Source server: host1, Database: sales\n\
//!      Processing view: v_sales\n\
//!      Create Statement:\n\
//!      ---\n\
//!      SELECT 1\n\
//!      ---\n",
//! );
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].create_sql, "SELECT 1");
//! assert_eq!(records[0].alter_sql, "");
//! ```

pub mod markers;
mod parser;
mod transcript;


use std::path::Path;

use crate::error::{DefinerError, Result};

pub use parser::{ReportParser, Section};
pub use transcript::TranscriptWriter;

/// One view reconstructed from a transcript.
///
/// Empty `create_sql` / `alter_sql` mean the section was not found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectRecord {
    pub server: String,
    pub database: String,
    pub name: String,
    pub create_sql: String,
    pub alter_sql: String,
}

impl ObjectRecord {
    /// `database.name`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.database, self.name)
    }
}

/// Parse an ordered sequence of lines.
pub fn parse_report<I, S>(lines: I) -> Vec<ObjectRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = ReportParser::new();
    for line in lines {
        parser.feed_line(line.as_ref());
    }
    parser.finish()
}

pub fn parse_report_str(text: &str) -> Vec<ObjectRecord> {
    parse_report(text.lines())
}

/// Read and parse a transcript file.
pub fn read_report(path: impl AsRef<Path>) -> Result<Vec<ObjectRecord>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| DefinerError::io(path, e))?;
    Ok(parse_report_str(&text))
}
