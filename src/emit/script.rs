//! Forward / rollback script pairs.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use super::format::format_sql;
use crate::ddl::{decompose, Algorithm};
use crate::error::{DefinerError, ParseError, Result};
use crate::report::ObjectRecord;

/// Body written in place of SQL when nothing was captured.
pub const EMPTY_PLACEHOLDER: &str = "-- ERROR: No SQL content found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    Forward,
    Rollback,
}

/// File-name prefixes for the two halves of a pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptNaming {
    pub forward_prefix: String,
    pub rollback_prefix: String,
}

impl Default for ScriptNaming {
    fn default() -> Self {
        Self {
            forward_prefix: "V".to_string(),
            rollback_prefix: "U".to_string(),
        }
    }
}

impl ScriptNaming {
    fn file_name(&self, kind: ScriptKind, object: &str) -> String {
        let prefix = match kind {
            ScriptKind::Forward => &self.forward_prefix,
            ScriptKind::Rollback => &self.rollback_prefix,
        };
        format!("{}{}.sql", prefix, sanitize(object))
    }
}

/// One generated file, fully rendered in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub kind: ScriptKind,
    pub schema: String,
    pub object: String,
    pub file_name: String,
    pub contents: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptPair {
    pub forward: Script,
    pub rollback: Script,
}

/// Turn a forward `ALTER` into its rollback.
///
/// Replaces the first `ALTER` with `CREATE OR REPLACE` and the first
/// `ALGORITHM = MERGE` with `ALGORITHM = UNDEFINED`. Only a change to MERGE
/// is really undone; for any other target the result is valid SQL that
/// still carries the forward algorithm.
pub fn rollback_statement(forward: &str) -> String {
    forward
        .replacen("ALTER", "CREATE OR REPLACE", 1)
        .replacen("ALGORITHM = MERGE", "ALGORITHM = UNDEFINED", 1)
}

/// Pick the forward statement for a record.
///
/// Without a target the captured ALTER text is used as is. With one, the
/// captured ALTER (or, failing that, CREATE) text is decomposed and
/// recomposed for the target. An empty result means nothing was captured.
pub fn forward_sql(
    record: &ObjectRecord,
    target: Option<Algorithm>,
) -> std::result::Result<String, ParseError> {
    let Some(algorithm) = target else {
        return Ok(record.alter_sql.clone());
    };

    let source = if record.alter_sql.is_empty() {
        &record.create_sql
    } else {
        &record.alter_sql
    };
    if source.is_empty() {
        return Ok(String::new());
    }

    Ok(decompose(source)?.compose(&record.database, &record.name, algorithm))
}

impl ScriptPair {
    /// Render both files for `forward` (may be empty).
    pub fn build(schema: &str, object: &str, forward: &str, naming: &ScriptNaming) -> Self {
        let forward_body = body_or_placeholder(forward);
        let rollback_body = if forward.trim().is_empty() {
            EMPTY_PLACEHOLDER.to_string()
        } else {
            body_or_placeholder(&rollback_statement(forward))
        };

        let forward = Script {
            kind: ScriptKind::Forward,
            schema: schema.to_string(),
            object: object.to_string(),
            file_name: naming.file_name(ScriptKind::Forward, object),
            contents: format!(
                "-- Flyway Migration Script\n-- Database: {}\n-- View: {}\n\n{}\n",
                schema, object, forward_body
            ),
        };

        let rollback = Script {
            kind: ScriptKind::Rollback,
            schema: schema.to_string(),
            object: object.to_string(),
            file_name: naming.file_name(ScriptKind::Rollback, object),
            contents: format!(
                "-- Flyway Undo Script (Rollback)\n-- Database: {}\n-- View: {}\n-- Changes ALGORITHM back to UNDEFINED using CREATE OR REPLACE\n\n{}\n",
                schema, object, rollback_body
            ),
        };

        Self { forward, rollback }
    }

    /// Build the pair for a parsed record. Fails only when a target
    /// algorithm is given and the captured DDL cannot be decomposed.
    pub fn for_record(
        record: &ObjectRecord,
        target: Option<Algorithm>,
        naming: &ScriptNaming,
    ) -> Result<Self> {
        let forward = forward_sql(record, target)
            .map_err(|e| DefinerError::object(&record.database, &record.name, e))?;
        Ok(Self::build(&record.database, &record.name, &forward, naming))
    }

    pub fn scripts(&self) -> [&Script; 2] {
        [&self.forward, &self.rollback]
    }
}

impl Script {
    /// Write to `<out_dir>/<schema>/<file_name>`.
    ///
    /// Fails if the file exists, unless `overwrite` is set.
    pub fn write_into(&self, out_dir: &Path, overwrite: bool) -> Result<PathBuf> {
        let dir = out_dir.join(sanitize(&self.schema));
        fs::create_dir_all(&dir).map_err(|e| DefinerError::io(&dir, e))?;

        let path = dir.join(&self.file_name);
        let mut options = OpenOptions::new();
        options.write(true);
        if overwrite {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options.open(&path).map_err(|e| DefinerError::io(&path, e))?;
        file.write_all(self.contents.as_bytes())
            .map_err(|e| DefinerError::io(&path, e))?;

        info!(path = %path.display(), kind = ?self.kind, "wrote script");
        Ok(path)
    }
}

fn body_or_placeholder(sql: &str) -> String {
    let formatted = format_sql(sql);
    if formatted.is_empty() {
        EMPTY_PLACEHOLDER.to_string()
    } else {
        formatted
    }
}

/// Keep names usable as a single path component. Separators become `_`,
/// and so do names made only of dots (`.`, `..`).
fn sanitize(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c == '.') {
        return "_".repeat(name.len());
    }
    name.chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const ALTER: &str = "ALTER\n    ALGORITHM = MERGE\n    DEFINER=`app`@`%`\n    SQL SECURITY DEFINER\n    VIEW `sales`.`v_sales` AS select `id` from `orders`;";

    fn record(alter: &str, create: &str) -> ObjectRecord {
        ObjectRecord {
            server: "db-01".into(),
            database: "sales".into(),
            name: "v_sales".into(),
            create_sql: create.into(),
            alter_sql: alter.into(),
        }
    }

    #[test]
    fn test_rollback_replaces_first_alter_only() {
        let forward = "ALTER ALGORITHM = MERGE VIEW v AS select 'ALTER' from t";
        let rollback = rollback_statement(forward);
        assert_eq!(
            rollback,
            "CREATE OR REPLACE ALGORITHM = UNDEFINED VIEW v AS select 'ALTER' from t"
        );
        assert_eq!(rollback.matches("CREATE OR REPLACE").count(), 1);
    }

    #[test]
    fn test_rollback_leaves_other_algorithms() {
        let rollback = rollback_statement("ALTER ALGORITHM = TEMPTABLE VIEW v AS select 1");
        assert!(rollback.contains("ALGORITHM = TEMPTABLE"));
        assert!(rollback.starts_with("CREATE OR REPLACE"));
    }

    #[test]
    fn test_pair_contents() {
        let pair = ScriptPair::build("sales", "v_sales", ALTER, &ScriptNaming::default());

        assert_eq!(pair.forward.file_name, "Vv_sales.sql");
        assert_eq!(pair.rollback.file_name, "Uv_sales.sql");
        assert_eq!(
            pair.forward.contents,
            "-- Flyway Migration Script\n-- Database: sales\n-- View: v_sales\n\nALTER\n    ALGORITHM = MERGE\n    DEFINER=`app`@`%`\n    SQL SECURITY\n    DEFINER\n    VIEW `sales`.`v_sales`\n    AS select `id`\n    from `orders`;\n"
        );
        assert!(pair.rollback.contents.starts_with("-- Flyway Undo Script (Rollback)\n-- Database: sales\n-- View: v_sales\n"));
        assert!(pair.rollback.contents.contains("\n\nCREATE OR REPLACE\n    ALGORITHM = UNDEFINED\n"));
    }

    #[test]
    fn test_empty_capture_gives_placeholders() {
        let pair = ScriptPair::build("sales", "v_empty", "", &ScriptNaming::default());
        assert!(pair.forward.contents.ends_with(&format!("\n\n{}\n", EMPTY_PLACEHOLDER)));
        assert!(pair.rollback.contents.ends_with(&format!("\n\n{}\n", EMPTY_PLACEHOLDER)));
    }

    #[test]
    fn test_forward_sql_verbatim_without_target() {
        assert_eq!(forward_sql(&record(ALTER, ""), None).unwrap(), ALTER);
        assert_eq!(forward_sql(&record("", "CREATE ..."), None).unwrap(), "");
    }

    #[test]
    fn test_forward_sql_recomposes_for_target() {
        let sql = forward_sql(&record(ALTER, ""), Some(Algorithm::TempTable)).unwrap();
        assert!(sql.contains("ALGORITHM = TEMPTABLE"));
        assert!(sql.contains("VIEW `sales`.`v_sales` AS select `id` from `orders`;"));
    }

    #[test]
    fn test_forward_sql_falls_back_to_create() {
        let create = "CREATE ALGORITHM=UNDEFINED DEFINER=`app`@`%` SQL SECURITY DEFINER VIEW `v_sales` AS select 1";
        let sql = forward_sql(&record("", create), Some(Algorithm::Merge)).unwrap();
        assert_eq!(
            sql,
            "ALTER\n    ALGORITHM = MERGE\n    DEFINER=`app`@`%`\n    SQL SECURITY DEFINER\n    VIEW `sales`.`v_sales` AS select 1;"
        );
    }

    #[test]
    fn test_for_record_reports_identity_on_failure() {
        let rec = record("", "CREATE VIEW `v_sales` AS select 1");
        let err = ScriptPair::for_record(&rec, Some(Algorithm::Merge), &ScriptNaming::default())
            .unwrap_err();
        match err {
            DefinerError::Object { schema, name, source } => {
                assert_eq!(schema, "sales");
                assert_eq!(name, "v_sales");
                assert_eq!(source, ParseError::MissingDefiner);
            }
            other => panic!("Expected DefinerError::Object, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_prefixes_and_sanitized_names() {
        let naming = ScriptNaming {
            forward_prefix: "V2__".into(),
            rollback_prefix: "U2__".into(),
        };
        let pair = ScriptPair::build("sales", "odd/name", ALTER, &naming);
        assert_eq!(pair.forward.file_name, "V2__odd_name.sql");
        assert_eq!(pair.rollback.file_name, "U2__odd_name.sql");
    }

    #[test]
    fn test_write_is_create_or_fail() {
        let dir = tempfile::tempdir().unwrap();
        let pair = ScriptPair::build("sales", "v_sales", ALTER, &ScriptNaming::default());

        let path = pair.forward.write_into(dir.path(), false).unwrap();
        assert_eq!(path, dir.path().join("sales").join("Vv_sales.sql"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), pair.forward.contents);

        let err = pair.forward.write_into(dir.path(), false).unwrap_err();
        assert!(matches!(err, DefinerError::Io { .. }));

        pair.forward.write_into(dir.path(), true).unwrap();
    }

    #[test]
    fn test_dot_names_stay_inside_out_dir() {
        assert_eq!(sanitize(".."), "__");
        assert_eq!(sanitize("."), "_");
        assert_eq!(sanitize("v.sales"), "v.sales");

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let pair = ScriptPair::build("..", "..", ALTER, &ScriptNaming::default());

        let path = pair.forward.write_into(&out, false).unwrap();
        assert_eq!(path, out.join("__").join("V__.sql"));
        assert!(path.starts_with(&out));
        assert!(!dir.path().join("V__.sql").exists());
    }
}
