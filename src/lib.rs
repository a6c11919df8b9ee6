//! # definer
//!
//! Audit MySQL objects that carry a `DEFINER` and move views between
//! algorithms through reviewable Flyway migration pairs.
//!
//! The pipeline is:
//!
//! 1. [`catalog`] dumps view definitions from a live server as a transcript
//!    ([`report::TranscriptWriter`]).
//! 2. [`report`] parses a transcript back into [`report::ObjectRecord`]s.
//! 3. [`ddl`] splits a `CREATE VIEW` into definer, security and body, and
//!    recomposes it as an `ALTER` for a chosen [`ddl::Algorithm`].
//! 4. [`emit`] formats the statement and writes forward (`V<view>.sql`) and
//!    rollback (`U<view>.sql`) scripts per schema.
//!
//! ```
//! use definer::ddl::{decompose, Algorithm};
//!
//! let ddl = "CREATE ALGORITHM=UNDEFINED DEFINER=`app`@`%` SQL SECURITY DEFINER VIEW `v` AS select 1";
//! let alter = decompose(ddl).unwrap().compose("sales", "v", Algorithm::Merge);
//! assert!(alter.starts_with("ALTER\n    ALGORITHM = MERGE"));
//! ```

pub mod catalog;
pub mod commands;
pub mod config;
pub mod credentials;
pub mod ddl;
pub mod emit;
pub mod error;
pub mod logging;
pub mod render;
pub mod report;

pub use config::Config;
pub use ddl::{decompose, Algorithm, ParsedDdl};
pub use emit::{emit_all, format_sql, EmitOptions, EmitSummary, ScriptPair};
pub use error::{DefinerError, ParseError, Result};
pub use report::{parse_report, parse_report_str, read_report, ObjectRecord};
