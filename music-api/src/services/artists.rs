//! Artist service

use music_common::chain::{Component, Package};
use music_common::persist::Querier;
use music_common::Artist;
use std::sync::Arc;
use tracing::debug;

use super::{resolve_name, single, ServiceError};
use crate::db::ArtistStore;

const ERR: Component = Package::new("artists").component("service");

/// Artist use cases. Artists are never updated in place.
#[derive(Clone)]
pub struct ArtistService {
    store: ArtistStore,
}

impl ArtistService {
    pub fn new(db: Arc<dyn Querier>) -> Self {
        Self {
            store: ArtistStore::new(db),
        }
    }

    pub async fn list(&self) -> Result<Vec<Artist>, ServiceError> {
        let e = ERR.function("list");
        self.store
            .get(None)
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "getting artists from db")))
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Artist>, ServiceError> {
        let e = ERR.function("get_by_name").tag("name", name);
        let artists = self
            .store
            .get(Some(name))
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "getting artist from db")))?;
        Ok(single(artists))
    }

    pub async fn create(&self, path_name: &str, mut artist: Artist) -> Result<(), ServiceError> {
        let e = ERR.function("create").tag("name", path_name);
        resolve_name(&e, path_name, &mut artist.name)?;

        let result = self
            .store
            .create(&artist)
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "saving artist")))?;
        if result.rows_affected == 0 {
            return Err(ServiceError::Validation(e.db(e.new("no artist was inserted"))));
        }
        debug!(name = %artist.name, id = result.last_insert_id, "Artist created");
        Ok(())
    }

    pub async fn delete(&self, name: &str) -> Result<(), ServiceError> {
        let e = ERR.function("delete").tag("name", name);
        self.store
            .delete(name)
            .await
            .map_err(|err| ServiceError::Transport(e.wrap(err, "deleting artist")))?;
        Ok(())
    }
}
