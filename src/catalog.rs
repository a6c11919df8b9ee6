//! MySQL catalog access: schemas, definer inventory, `SHOW CREATE`, and
//! `ALTER VIEW` execution.

use serde::Serialize;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::{Executor, Row};
use tracing::{info, warn};

use crate::credentials::Credentials;
use crate::ddl::{decompose, quote_ident, Algorithm};
use crate::error::{DefinerError, Result};

/// Kinds of objects that carry a definer (plus tables, for `SHOW CREATE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObjectKind {
    Procedure,
    Function,
    View,
    Trigger,
    Event,
    Table,
}

impl ObjectKind {
    /// Parse the type strings information_schema reports.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PROCEDURE" => Some(ObjectKind::Procedure),
            "FUNCTION" => Some(ObjectKind::Function),
            "VIEW" => Some(ObjectKind::View),
            "TRIGGER" => Some(ObjectKind::Trigger),
            "EVENT" => Some(ObjectKind::Event),
            "TABLE" | "BASE TABLE" => Some(ObjectKind::Table),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Procedure => "PROCEDURE",
            ObjectKind::Function => "FUNCTION",
            ObjectKind::View => "VIEW",
            ObjectKind::Trigger => "TRIGGER",
            ObjectKind::Event => "EVENT",
            ObjectKind::Table => "TABLE",
        }
    }

    /// Column of the `SHOW CREATE` result holding the statement.
    pub fn create_column(&self) -> &'static str {
        match self {
            ObjectKind::Procedure => "Create Procedure",
            ObjectKind::Function => "Create Function",
            ObjectKind::View => "Create View",
            ObjectKind::Trigger => "SQL Original Statement",
            ObjectKind::Event => "Create Event",
            ObjectKind::Table => "Create Table",
        }
    }

    pub fn show_create_sql(&self, database: &str, name: &str) -> String {
        format!(
            "SHOW CREATE {} {}.{}",
            self.as_str(),
            quote_ident(database),
            quote_ident(name)
        )
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the definer inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DefinerObject {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ObjectKind,
    pub definer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateStatement {
    pub name: String,
    pub kind: ObjectKind,
    pub sql: String,
}

const DATABASES_SQL: &str =
    "SELECT CAST(schema_name AS CHAR) AS name FROM information_schema.schemata";

const DEFINER_OBJECTS_SQL: &str = "
    SELECT CAST(ROUTINE_NAME AS CHAR) AS name, CAST(ROUTINE_TYPE AS CHAR) AS kind, CAST(DEFINER AS CHAR) AS definer
      FROM INFORMATION_SCHEMA.ROUTINES WHERE ROUTINE_SCHEMA = ?
    UNION ALL
    SELECT CAST(TABLE_NAME AS CHAR), 'VIEW', CAST(DEFINER AS CHAR)
      FROM INFORMATION_SCHEMA.VIEWS WHERE TABLE_SCHEMA = ?
    UNION ALL
    SELECT CAST(TRIGGER_NAME AS CHAR), 'TRIGGER', CAST(DEFINER AS CHAR)
      FROM INFORMATION_SCHEMA.TRIGGERS WHERE TRIGGER_SCHEMA = ?
    UNION ALL
    SELECT CAST(EVENT_NAME AS CHAR), 'EVENT', CAST(DEFINER AS CHAR)
      FROM INFORMATION_SCHEMA.EVENTS WHERE EVENT_SCHEMA = ?
";

const OBJECT_KIND_SQL: &str = "
    SELECT 'VIEW' AS kind FROM INFORMATION_SCHEMA.VIEWS
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
    UNION ALL
    SELECT CAST(ROUTINE_TYPE AS CHAR) FROM INFORMATION_SCHEMA.ROUTINES
     WHERE ROUTINE_SCHEMA = ? AND ROUTINE_NAME = ?
    UNION ALL
    SELECT 'TRIGGER' FROM INFORMATION_SCHEMA.TRIGGERS
     WHERE TRIGGER_SCHEMA = ? AND TRIGGER_NAME = ?
    UNION ALL
    SELECT 'EVENT' FROM INFORMATION_SCHEMA.EVENTS
     WHERE EVENT_SCHEMA = ? AND EVENT_NAME = ?
    UNION ALL
    SELECT 'TABLE' FROM INFORMATION_SCHEMA.TABLES
     WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ? AND TABLE_TYPE = 'BASE TABLE'
    LIMIT 1
";

const VIEW_NAMES_SQL: &str = "
    SELECT CAST(TABLE_NAME AS CHAR) AS name FROM INFORMATION_SCHEMA.VIEWS
     WHERE TABLE_SCHEMA = ? ORDER BY TABLE_NAME
";

const IS_VIEW_SQL: &str =
    "SELECT COUNT(*) FROM information_schema.views WHERE table_schema = ? AND table_name = ?";

/// Connected catalog client.
pub struct Catalog {
    pool: MySqlPool,
    source: String,
    hostname: String,
}

impl Catalog {
    /// Connect to `host:port`, defaulting the schema to `information_schema`.
    pub async fn connect(
        host: &str,
        port: u16,
        database: Option<&str>,
        credentials: &Credentials,
    ) -> Result<Self> {
        let mut options = MySqlConnectOptions::new()
            .host(host)
            .port(port)
            .database(database.unwrap_or("information_schema"));
        if let Some(user) = &credentials.user {
            options = options.username(user);
        }
        if let Some(password) = &credentials.password {
            options = options.password(password);
        }

        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .connect_with(options)
            .await?;

        let hostname: String = sqlx::query_scalar("SELECT CAST(@@hostname AS CHAR)")
            .fetch_one(&pool)
            .await?;
        info!(host, hostname = %hostname, "connected");

        Ok(Self {
            pool,
            source: host.to_string(),
            hostname,
        })
    }

    /// Host as given on the command line.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// `@@hostname` reported by the server.
    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub async fn databases(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(DATABASES_SQL).fetch_all(&self.pool).await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(DefinerError::from))
            .collect()
    }

    /// Routines, views, triggers and events of `database` with their definer.
    pub async fn definer_objects(&self, database: &str) -> Result<Vec<DefinerObject>> {
        let rows = sqlx::query(DEFINER_OBJECTS_SQL)
            .bind(database)
            .bind(database)
            .bind(database)
            .bind(database)
            .fetch_all(&self.pool)
            .await?;

        let mut objects = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row.try_get("name")?;
            let kind_str: String = row.try_get("kind")?;
            let definer: String = row.try_get("definer")?;
            let kind = ObjectKind::parse(&kind_str).ok_or_else(|| DefinerError::UnknownKind {
                kind: kind_str.clone(),
                name: name.clone(),
            })?;
            objects.push(DefinerObject {
                name,
                kind,
                definer,
            });
        }
        Ok(objects)
    }

    pub async fn object_kind(&self, database: &str, name: &str) -> Result<ObjectKind> {
        let mut query = sqlx::query_scalar::<_, String>(OBJECT_KIND_SQL);
        for _ in 0..5 {
            query = query.bind(database).bind(name);
        }

        let kind = query
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DefinerError::NotFound {
                database: database.to_string(),
                name: name.to_string(),
            })?;

        ObjectKind::parse(&kind).ok_or_else(|| DefinerError::UnknownKind {
            kind,
            name: name.to_string(),
        })
    }

    /// Look up the object's kind, then run the matching `SHOW CREATE`.
    pub async fn show_create(&self, database: &str, name: &str) -> Result<CreateStatement> {
        let kind = self.object_kind(database, name).await?;
        let sql = kind.show_create_sql(database, name);
        let row = (&self.pool).fetch_one(sql.as_str()).await?;

        let statement: Option<String> = row.try_get(kind.create_column())?;
        let statement = statement.unwrap_or_else(|| {
            warn!(database, name, "SHOW CREATE returned no statement (missing privileges?)");
            String::new()
        });

        Ok(CreateStatement {
            name: name.to_string(),
            kind,
            sql: statement,
        })
    }

    pub async fn view_names(&self, database: &str) -> Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(VIEW_NAMES_SQL)
            .bind(database)
            .fetch_all(&self.pool)
            .await?;
        Ok(names)
    }

    pub async fn is_view(&self, database: &str, name: &str) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(IS_VIEW_SQL)
            .bind(database)
            .bind(name)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    /// Current view definition rewritten as `ALTER VIEW ... ALGORITHM = algorithm`.
    pub async fn alter_view_statement(
        &self,
        database: &str,
        view: &str,
        algorithm: Algorithm,
    ) -> Result<String> {
        let sql = ObjectKind::View.show_create_sql(database, view);
        let row = (&self.pool).fetch_one(sql.as_str()).await?;
        let create: String = row.try_get(ObjectKind::View.create_column())?;

        let parsed = decompose(&create).map_err(|e| DefinerError::object(database, view, e))?;
        Ok(parsed.compose(database, view, algorithm))
    }

    /// Run a statement over the text protocol.
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        let result = (&self.pool).execute(sql).await?;
        info!(rows = result.rows_affected(), "statement executed");
        Ok(result.rows_affected())
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!(ObjectKind::parse("procedure"), Some(ObjectKind::Procedure));
        assert_eq!(ObjectKind::parse("FUNCTION"), Some(ObjectKind::Function));
        assert_eq!(ObjectKind::parse("BASE TABLE"), Some(ObjectKind::Table));
        assert_eq!(ObjectKind::parse("SEQUENCE"), None);
    }

    #[test]
    fn test_show_create_sql_quotes_identifiers() {
        assert_eq!(
            ObjectKind::View.show_create_sql("sales", "v`x"),
            "SHOW CREATE VIEW `sales`.`v``x`"
        );
        assert_eq!(
            ObjectKind::Trigger.show_create_sql("sales", "trg"),
            "SHOW CREATE TRIGGER `sales`.`trg`"
        );
    }

    #[test]
    fn test_create_columns() {
        assert_eq!(ObjectKind::Trigger.create_column(), "SQL Original Statement");
        assert_eq!(ObjectKind::Event.create_column(), "Create Event");
    }

    #[test]
    fn test_kind_lookup_binds_every_branch() {
        assert_eq!(OBJECT_KIND_SQL.matches('?').count(), 10);
        assert_eq!(DEFINER_OBJECTS_SQL.matches('?').count(), 4);
    }

    #[test]
    fn test_definer_object_json() {
        let obj = DefinerObject {
            name: "p_refresh".into(),
            kind: ObjectKind::Procedure,
            definer: "app@%".into(),
        };
        let json = serde_json::to_value(&obj).unwrap();
        assert_eq!(json["type"], "PROCEDURE");
        assert_eq!(json["definer"], "app@%");
    }
}
