//! Song persistence

use music_common::chain::{Chain, Component, Package};
use music_common::persist::{ExecResult, Querier, Value};
use music_common::Song;
use sqlx::FromRow;
use std::sync::Arc;

const ERR: Component = Package::new("songs").component("db");

const SELECT_SONGS: &str = "SELECT id, name, duration, artist_id FROM Songs";

/// SQL access to the `Songs` table
#[derive(Clone)]
pub struct SongStore {
    db: Arc<dyn Querier>,
}

impl SongStore {
    pub fn new(db: Arc<dyn Querier>) -> Self {
        Self { db }
    }

    /// Songs matching `name`, or every song when `name` is `None`
    ///
    /// A name lookup reads at most two rows: enough for the caller to tell
    /// a unique match from an ambiguous one.
    pub async fn get(&self, name: Option<&str>) -> Result<Vec<Song>, Chain> {
        let e = ERR.function("get").tag("name", name.unwrap_or_default());

        let (sql, params) = match name {
            Some(name) => (
                format!("{} WHERE name = ? LIMIT 2", SELECT_SONGS),
                vec![Value::from(name)],
            ),
            None => (SELECT_SONGS.to_string(), Vec::new()),
        };

        let mut rows = self
            .db
            .query(&sql, &params)
            .await
            .map_err(|err| e.wrap(err, "querying songs from table"))?;

        let mut songs = Vec::new();
        while let Some(row) = rows.next().await.map_err(|err| e.wrap(err, "reading rows"))? {
            let song = Song::from_row(&row).map_err(|err| e.wrap(err, "scanning rows"))?;
            songs.push(song);
        }
        Ok(songs)
    }

    pub async fn create(&self, song: &Song) -> Result<ExecResult, Chain> {
        let e = ERR.function("create").tag("name", &song.name);
        self.db
            .exec(
                "INSERT INTO Songs (name, duration, artist_id) VALUES (?, ?, ?)",
                &[
                    Value::from(&song.name),
                    Value::from(&song.duration),
                    Value::from(song.artist_id),
                ],
            )
            .await
            .map_err(|err| e.wrap(err, "inserting"))
    }

    /// Update duration and artist of every song called `song.name`
    pub async fn update(&self, song: &Song) -> Result<ExecResult, Chain> {
        let e = ERR.function("update").tag("name", &song.name);
        self.db
            .exec(
                "UPDATE Songs SET duration = ?, artist_id = ? WHERE name = ?",
                &[
                    Value::from(&song.duration),
                    Value::from(song.artist_id),
                    Value::from(&song.name),
                ],
            )
            .await
            .map_err(|err| e.wrap(err, "updating"))
    }

    pub async fn delete(&self, name: &str) -> Result<ExecResult, Chain> {
        let e = ERR.function("delete").tag("name", name);
        self.db
            .exec("DELETE FROM Songs WHERE name = ?", &[Value::from(name)])
            .await
            .map_err(|err| e.wrap(err, "deleting"))
    }
}
