//! Persistence capability and its SQLite adapter
//!
//! Services depend on [`Querier`] only; [`Conn`] is the concrete adapter
//! injected at startup. Statements use positional `?` parameters and errors
//! are handed back exactly as sqlx reports them.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;

mod rows;
mod schema;
mod sqlite;

pub use rows::Rows;
pub use schema::ensure_schema;
pub use sqlite::{connect, Conn, PoolLimits, Tx};

/// Positional parameter bound to a statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Int(i64),
    Text(String),
    Null,
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// Metadata of an executed statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecResult {
    pub rows_affected: u64,
    pub last_insert_id: i64,
}

/// Anything that can run SQL against the store
#[async_trait]
pub trait Querier: Send + Sync {
    /// Run a query and return a cursor over its rows
    async fn query(&self, sql: &str, params: &[Value]) -> Result<Rows, sqlx::Error>;

    /// Run a query that is expected to return at most one row
    async fn query_row(&self, sql: &str, params: &[Value]) -> Result<Option<SqliteRow>, sqlx::Error>;

    /// Run a statement immediately
    async fn exec(&self, sql: &str, params: &[Value]) -> Result<ExecResult, sqlx::Error>;

    /// Start a transaction
    async fn begin(&self) -> Result<Tx, sqlx::Error>;

    /// Whether a row of `table` matches `condition`
    ///
    /// Lookup failures answer `true` so callers never assume absence.
    async fn row_exists(&self, table: &str, condition: &str, params: &[Value]) -> bool;
}
