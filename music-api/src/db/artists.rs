//! Artist persistence

use music_common::chain::{Chain, Component, Package};
use music_common::persist::{ExecResult, Querier, Value};
use music_common::Artist;
use sqlx::FromRow;
use std::sync::Arc;

const ERR: Component = Package::new("artists").component("db");

const SELECT_ARTISTS: &str = "SELECT id, name FROM Artists";

/// SQL access to the `Artists` table
#[derive(Clone)]
pub struct ArtistStore {
    db: Arc<dyn Querier>,
}

impl ArtistStore {
    pub fn new(db: Arc<dyn Querier>) -> Self {
        Self { db }
    }

    /// Artists matching `name` (at most two), or all of them
    pub async fn get(&self, name: Option<&str>) -> Result<Vec<Artist>, Chain> {
        let e = ERR.function("get").tag("name", name.unwrap_or_default());

        let (sql, params) = match name {
            Some(name) => (
                format!("{} WHERE name = ? LIMIT 2", SELECT_ARTISTS),
                vec![Value::from(name)],
            ),
            None => (SELECT_ARTISTS.to_string(), Vec::new()),
        };

        let mut rows = self
            .db
            .query(&sql, &params)
            .await
            .map_err(|err| e.wrap(err, "querying artists from table"))?;

        let mut artists = Vec::new();
        while let Some(row) = rows.next().await.map_err(|err| e.wrap(err, "reading rows"))? {
            artists.push(Artist::from_row(&row).map_err(|err| e.wrap(err, "scanning rows"))?);
        }
        Ok(artists)
    }

    pub async fn create(&self, artist: &Artist) -> Result<ExecResult, Chain> {
        let e = ERR.function("create").tag("name", &artist.name);
        self.db
            .exec("INSERT INTO Artists (name) VALUES (?)", &[Value::from(&artist.name)])
            .await
            .map_err(|err| e.wrap(err, "inserting"))
    }

    pub async fn delete(&self, name: &str) -> Result<ExecResult, Chain> {
        let e = ERR.function("delete").tag("name", name);
        self.db
            .exec("DELETE FROM Artists WHERE name = ?", &[Value::from(name)])
            .await
            .map_err(|err| e.wrap(err, "deleting"))
    }
}
