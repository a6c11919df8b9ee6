//! View DDL decomposition and `ALTER VIEW` composition.
//!
//! This is a marker scan over the text MySQL itself produces for
//! `SHOW CREATE VIEW`, not a SQL parser. Clause order and casing in that
//! output are stable, so the scan looks for `DEFINER=`, `SQL SECURITY` and
//! the first ` AS `, in that order, and fails with a named [`ParseError`]
//! when one is missing.
//!
//! # Example
//! ```
//! use definer::ddl::{decompose, Algorithm};
//!
//! let ddl = "CREATE ALGORITHM=UNDEFINED DEFINER=`app`@`%` SQL SECURITY DEFINER \
//!            VIEW `v_sales` AS select `id` from `orders`";
//! let parsed = decompose(ddl).unwrap();
//! assert_eq!(parsed.definer_clause, "DEFINER=`app`@`%`");
//!
//! let alter = parsed.compose("sales", "v_sales", Algorithm::Merge);
//! assert!(alter.starts_with("ALTER\n    ALGORITHM = MERGE\n"));
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ParseError;

const DEFINER_MARKER: &str = "DEFINER=";
const SECURITY_MARKER: &str = "SQL SECURITY";

// Marker spaces match any whitespace, so text captured across several lines
// scans like the single-line engine output. ` AS ` takes exactly one
// whitespace character on each side.
static SECURITY_AFTER_DEFINER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+SQL SECURITY").expect("static regex"));
static VIEW_AFTER_SECURITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+VIEW").expect("static regex"));
static BODY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\sAS\s").expect("static regex"));

/// View execution strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Merge,
    TempTable,
    Undefined,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Merge => "MERGE",
            Algorithm::TempTable => "TEMPTABLE",
            Algorithm::Undefined => "UNDEFINED",
        }
    }
}

impl FromStr for Algorithm {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MERGE" => Ok(Algorithm::Merge),
            "TEMPTABLE" => Ok(Algorithm::TempTable),
            "UNDEFINED" => Ok(Algorithm::Undefined),
            _ => Err(ParseError::InvalidAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three clauses an `ALTER VIEW` needs from the original definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDdl {
    /// Verbatim `DEFINER=...` fragment.
    pub definer_clause: String,
    /// Verbatim `SQL SECURITY DEFINER|INVOKER` fragment.
    pub security_clause: String,
    /// Everything after the first ` AS `, without trailing whitespace or `;`.
    pub body: String,
}

/// Split a `SHOW CREATE VIEW` (or generated `ALTER VIEW`) string into its
/// definer, security and body clauses.
pub fn decompose(ddl: &str) -> Result<ParsedDdl, ParseError> {
    let definer_start = ddl.find(DEFINER_MARKER).ok_or(ParseError::MissingDefiner)?;
    let definer_end = SECURITY_AFTER_DEFINER
        .find(&ddl[definer_start..])
        .ok_or(ParseError::MissingDefiner)?
        .start()
        + definer_start;

    let security_start = ddl.find(SECURITY_MARKER).ok_or(ParseError::MissingSecurity)?;
    let security_end = VIEW_AFTER_SECURITY
        .find(&ddl[security_start..])
        .ok_or(ParseError::MissingSecurity)?
        .start()
        + security_start;

    let body_start = BODY_MARKER.find(ddl).ok_or(ParseError::MissingBody)?.end();
    let body = normalize_body(&ddl[body_start..]);
    if body.trim().is_empty() {
        return Err(ParseError::MissingBody);
    }

    Ok(ParsedDdl {
        definer_clause: ddl[definer_start..definer_end].to_string(),
        security_clause: ddl[security_start..security_end].to_string(),
        body: body.to_string(),
    })
}

/// Body as embedded by [`ParsedDdl::compose`]: no trailing whitespace or `;`.
fn normalize_body(body: &str) -> &str {
    body.trim_end().trim_end_matches(';').trim_end()
}

impl ParsedDdl {
    /// Build `ALTER ALGORITHM = ... VIEW schema.view AS body;`.
    pub fn compose(&self, schema: &str, view: &str, algorithm: Algorithm) -> String {
        let body = normalize_body(&self.body);
        format!(
            "ALTER\n    ALGORITHM = {}\n    {}\n    {}\n    VIEW {}.{} AS {};",
            algorithm,
            self.definer_clause,
            self.security_clause,
            quote_ident(schema),
            quote_ident(view),
            body
        )
    }
}

/// Validate `algorithm`, decompose `ddl` and compose the `ALTER VIEW`.
pub fn rewrite_algorithm(
    ddl: &str,
    schema: &str,
    view: &str,
    algorithm: &str,
) -> Result<String, ParseError> {
    let algorithm: Algorithm = algorithm.parse()?;
    Ok(decompose(ddl)?.compose(schema, view, algorithm))
}

/// Backtick-quote a MySQL identifier.
pub fn quote_ident(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}
