//! Error types for definer.
//!
//! `ParseError` covers the pure text core (DDL decomposition and algorithm
//! validation). `DefinerError` wraps everything that touches the outside
//! world: files, configuration and the MySQL catalog.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while decomposing a view DDL string or validating an algorithm.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// No `DEFINER=` clause followed by ` SQL SECURITY`.
    #[error("could not parse view definition: DEFINER clause not found")]
    MissingDefiner,
    /// No `SQL SECURITY` clause followed by ` VIEW`.
    #[error("could not parse SQL SECURITY setting")]
    MissingSecurity,
    /// No ` AS ` marker, or nothing after it.
    #[error("could not find view definition after AS")]
    MissingBody,
    /// Algorithm is not one of MERGE, TEMPTABLE, UNDEFINED.
    #[error("invalid algorithm: {0}. Must be MERGE, TEMPTABLE, or UNDEFINED")]
    InvalidAlgorithm(String),
}

/// Library-level error.
#[derive(Debug, Error)]
pub enum DefinerError {
    /// A parse failure attached to the object it happened on.
    #[error("{schema}.{name}: {source}")]
    Object {
        schema: String,
        name: String,
        #[source]
        source: ParseError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("object '{name}' not found in database '{database}'")]
    NotFound { database: String, name: String },

    #[error("unknown object type '{kind}' for '{name}'")]
    UnknownKind { kind: String, name: String },

    #[error("--algo can only be used with views. {0} is not a view")]
    NotAView(String),
}

impl DefinerError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DefinerError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn object(schema: &str, name: &str, source: ParseError) -> Self {
        DefinerError::Object {
            schema: schema.to_string(),
            name: name.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, DefinerError>;
