//! Song service

use music_common::chain::{Component, Package};
use music_common::persist::Querier;
use music_common::Song;
use std::sync::Arc;
use tracing::debug;

use super::{resolve_name, single, ServiceError};
use crate::db::SongStore;

const ERR: Component = Package::new("songs").component("service");

/// Song use cases
#[derive(Clone)]
pub struct SongService {
    store: SongStore,
}

impl SongService {
    pub fn new(db: Arc<dyn Querier>) -> Self {
        Self {
            store: SongStore::new(db),
        }
    }

    pub async fn list(&self) -> Result<Vec<Song>, ServiceError> {
        let e = ERR.function("list");
        self.store
            .get(None)
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "getting songs from db")))
    }

    /// The song called `name`; `None` unless exactly one row matches
    pub async fn get_by_name(&self, name: &str) -> Result<Option<Song>, ServiceError> {
        let e = ERR.function("get_by_name").tag("name", name);
        let songs = self
            .store
            .get(Some(name))
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "getting song from db")))?;
        Ok(single(songs))
    }

    /// Insert a new song
    pub async fn create(&self, path_name: &str, mut song: Song) -> Result<(), ServiceError> {
        let e = ERR.function("create").tag("name", path_name);
        resolve_name(&e, path_name, &mut song.name)?;

        let result = self
            .store
            .create(&song)
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "saving song")))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::Validation(e.db(e.new("no song was inserted"))));
        }
        debug!(name = %song.name, id = result.last_insert_id, "Song created");
        Ok(())
    }

    /// Update every song with this name, or insert one when there is none
    pub async fn save(&self, path_name: &str, mut song: Song) -> Result<(), ServiceError> {
        let e = ERR.function("save").tag("name", path_name);
        resolve_name(&e, path_name, &mut song.name)?;

        // Existence, not uniqueness: duplicates left by POST are updated too
        let exists = !self
            .store
            .get(Some(&song.name))
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "getting song")))?
            .is_empty();

        let result = if exists {
            self.store.update(&song).await
        } else {
            self.store.create(&song).await
        }
        .map_err(|err| ServiceError::Transport(e.wrap(err, "saving song")))?;

        if result.rows_affected == 0 {
            return Err(ServiceError::Validation(e.db(e.new("no song was saved"))));
        }
        debug!(name = %song.name, updated = exists, rows = result.rows_affected, "Song saved");
        Ok(())
    }

    /// Delete every song called `name`; succeeds when none matched
    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let e = ERR.function("delete").tag("name", name);
        let result = self
            .store
            .delete(name)
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "deleting song")))?;
        debug!(name, rows = result.rows_affected, "Song deleted");
        Ok(())
    }
}
