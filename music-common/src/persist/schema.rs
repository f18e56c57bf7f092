//! Table bootstrap
//!
//! Creates the two tables when missing. Idempotent; there is no versioning.

use sqlx::SqlitePool;
use tracing::debug;

/// Create the `Songs` and `Artists` tables if they do not exist yet
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    create_artists_table(pool).await?;
    create_songs_table(pool).await?;
    debug!("Schema ready");
    Ok(())
}

async fn create_artists_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Artists (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_artists_name ON Artists(name)")
        .execute(pool)
        .await?;

    Ok(())
}

// artist_id is deliberately not a foreign key
async fn create_songs_table(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS Songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            duration TEXT NOT NULL,
            artist_id INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_songs_name ON Songs(name)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{connect, PoolLimits};

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let url = format!("sqlite://{}?mode=rwc", temp_dir.path().join("s.db").display());
        let pool = connect(&url, PoolLimits::default()).await.unwrap();

        ensure_schema(&pool).await.expect("first run");
        ensure_schema(&pool).await.expect("second run");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('Songs', 'Artists') ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec![("Artists".to_string(),), ("Songs".to_string(),)]);
    }
}
