//! SQLite adapter for [`Querier`]

use async_trait::async_trait;
use futures::StreamExt;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use super::{ExecResult, Querier, Rows, Value};

/// Bounds of the connection pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolLimits {
    pub max_connections: u32,
    pub min_connections: u32,
}

impl Default for PoolLimits {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
        }
    }
}

/// Open a pool against `url` and check it answers
pub async fn connect(url: &str, limits: PoolLimits) -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(limits.max_connections)
        .min_connections(limits.min_connections)
        .connect(url)
        .await?;

    // Same probe as a ping: fail at startup rather than on the first request
    sqlx::query("SELECT 1").execute(&pool).await?;

    info!(
        max_connections = limits.max_connections,
        "Opened database pool"
    );
    Ok(pool)
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &'q [Value],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            Value::Int(v) => query.bind(*v),
            Value::Text(v) => query.bind(v.as_str()),
            Value::Null => query.bind(None::<String>),
        };
    }
    query
}

/// Connection pool wrapped as a [`Querier`]
#[derive(Debug, Clone)]
pub struct Conn {
    pool: SqlitePool,
}

impl Conn {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl Querier for Conn {
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Rows, sqlx::Error> {
        debug!(sql, params = params.len(), "query");

        let pool = self.pool.clone();
        let sql = sql.to_string();
        let params = params.to_vec();

        // Acquire up front so connection errors surface here and not on the
        // first call to next()
        let mut conn = pool.acquire().await?;
        let stream = async_stream::stream! {
            let query = bind_all(sqlx::query(&sql), &params);
            let mut rows = query.fetch(&mut *conn);
            while let Some(row) = rows.next().await {
                yield row;
            }
        };

        Ok(Rows::from_stream(Box::pin(stream)))
    }

    async fn query_row(&self, sql: &str, params: &[Value]) -> Result<Option<SqliteRow>, sqlx::Error> {
        debug!(sql, params = params.len(), "query_row");
        bind_all(sqlx::query(sql), params)
            .fetch_optional(&self.pool)
            .await
    }

    async fn exec(&self, sql: &str, params: &[Value]) -> Result<ExecResult, sqlx::Error> {
        debug!(sql, params = params.len(), "exec");
        let result = bind_all(sqlx::query(sql), params)
            .execute(&self.pool)
            .await?;
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }

    async fn begin(&self) -> Result<Tx, sqlx::Error> {
        Ok(Tx {
            tx: self.pool.begin().await?,
        })
    }

    async fn row_exists(&self, table: &str, condition: &str, params: &[Value]) -> bool {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM {} WHERE {})", table, condition);
        match self.query_row(&sql, params).await {
            Ok(Some(row)) => row.try_get::<i64, _>(0).map(|v| v != 0).unwrap_or(true),
            Ok(None) => false,
            Err(e) => {
                warn!(table, error = %e, "Row existence check failed");
                true
            }
        }
    }
}

/// Transaction on the store
pub struct Tx {
    tx: Transaction<'static, Sqlite>,
}

impl Tx {
    /// Run a statement inside the transaction
    pub async fn exec(&mut self, sql: &str, params: &[Value]) -> Result<ExecResult, sqlx::Error> {
        debug!(sql, params = params.len(), "tx exec");
        let result = bind_all(sqlx::query(sql), params)
            .execute(&mut *self.tx)
            .await?;
        Ok(ExecResult {
            rows_affected: result.rows_affected(),
            last_insert_id: result.last_insert_rowid(),
        })
    }

    pub async fn commit(self) -> Result<(), sqlx::Error> {
        self.tx.commit().await
    }

    /// Roll back, logging a failed rollback alongside the error that caused it
    pub async fn rollback(self, original: Option<&(dyn std::error::Error + 'static)>) {
        if let Err(e) = self.tx.rollback().await {
            warn!(
                error = %e,
                original = original.map(|o| o.to_string()).unwrap_or_default(),
                "There was a problem rolling back"
            );
        }
    }
}

impl std::fmt::Debug for Tx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tx").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::ensure_schema;
    use tempfile::TempDir;

    async fn setup_test_conn() -> (TempDir, Conn) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let url = format!("sqlite://{}?mode=rwc", temp_dir.path().join("test.db").display());
        let pool = connect(&url, PoolLimits::default())
            .await
            .expect("Failed to open test database");
        ensure_schema(&pool).await.expect("Schema creation failed");
        (temp_dir, Conn::new(pool))
    }

    async fn count_artists(conn: &Conn) -> i64 {
        let row = conn
            .query_row("SELECT COUNT(*) FROM Artists", &[])
            .await
            .unwrap()
            .unwrap();
        row.get(0)
    }

    #[tokio::test]
    async fn test_exec_reports_insert_metadata() {
        let (_dir, conn) = setup_test_conn().await;

        let first = conn
            .exec("INSERT INTO Artists (name) VALUES (?)", &["Queen".into()])
            .await
            .unwrap();
        let second = conn
            .exec("INSERT INTO Artists (name) VALUES (?)", &["Abba".into()])
            .await
            .unwrap();

        assert_eq!(first.rows_affected, 1);
        assert_eq!(second.last_insert_id, first.last_insert_id + 1);
    }

    #[tokio::test]
    async fn test_query_cursor_reads_rows_in_order() {
        let (_dir, conn) = setup_test_conn().await;
        for name in ["a", "b", "c"] {
            conn.exec("INSERT INTO Artists (name) VALUES (?)", &[name.into()])
                .await
                .unwrap();
        }

        let mut rows = conn
            .query("SELECT name FROM Artists ORDER BY id", &[])
            .await
            .unwrap();
        let mut names = Vec::new();
        while let Some(row) = rows.next().await.unwrap() {
            names.push(row.get::<String, _>("name"));
        }

        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(rows.is_closed());
    }

    #[tokio::test]
    async fn test_closing_early_releases_connection() {
        let temp_dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", temp_dir.path().join("one.db").display());
        let pool = connect(
            &url,
            PoolLimits {
                max_connections: 1,
                min_connections: 0,
            },
        )
        .await
        .unwrap();
        ensure_schema(&pool).await.unwrap();
        let conn = Conn::new(pool);
        for name in ["a", "b"] {
            conn.exec("INSERT INTO Artists (name) VALUES (?)", &[name.into()])
                .await
                .unwrap();
        }

        let mut rows = conn.query("SELECT name FROM Artists", &[]).await.unwrap();
        assert!(rows.next().await.unwrap().is_some());
        rows.close();

        // Would wait forever on the single connection if the cursor kept it
        assert_eq!(count_artists(&conn).await, 2);
    }

    #[tokio::test]
    async fn test_query_error_is_surfaced() {
        let (_dir, conn) = setup_test_conn().await;

        let mut rows = conn.query("SELECT nope FROM Missing", &[]).await.unwrap();
        assert!(rows.next().await.is_err());
        assert!(rows.is_closed());

        let exec = conn.exec("DELETE FROM Missing", &[]).await;
        assert!(matches!(exec, Err(sqlx::Error::Database(_))));
    }

    #[tokio::test]
    async fn test_transaction_commit_and_rollback() {
        let (_dir, conn) = setup_test_conn().await;

        let mut tx = conn.begin().await.unwrap();
        tx.exec("INSERT INTO Artists (name) VALUES (?)", &["kept".into()])
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let mut tx = conn.begin().await.unwrap();
        tx.exec("INSERT INTO Artists (name) VALUES (?)", &["dropped".into()])
            .await
            .unwrap();
        tx.rollback(None).await;

        assert_eq!(count_artists(&conn).await, 1);
        assert!(conn.row_exists("Artists", "name = ?", &["kept".into()]).await);
        assert!(!conn.row_exists("Artists", "name = ?", &["dropped".into()]).await);
    }

    #[tokio::test]
    async fn test_row_exists_answers_true_on_error() {
        let (_dir, conn) = setup_test_conn().await;
        assert!(conn.row_exists("Missing", "name = ?", &["x".into()]).await);
    }

    #[tokio::test]
    async fn test_null_parameter_binds() {
        let (_dir, conn) = setup_test_conn().await;
        let row = conn
            .query_row("SELECT ? IS NULL", &[Value::from(None::<i64>)])
            .await
            .unwrap()
            .unwrap();
        assert_eq!(row.get::<i64, _>(0), 1);
    }
}
