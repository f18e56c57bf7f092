//! Song endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use music_common::chain::{Component, Package};
use music_common::Song;

use super::{bind_json, encode_failure, service_failure, ApiError, Reply};
use crate::AppState;

const ERR: Component = Package::new("songs").component("api");

/// GET /songs
pub async fn get_songs(State(state): State<AppState>) -> Result<Reply, ApiError> {
    let e = ERR.function("get_songs");
    let songs = state
        .songs
        .list()
        .await
        .map_err(|err| service_failure(&e, err))?;
    Reply::json(StatusCode::OK, &songs).map_err(|err| encode_failure(&e, err))
}

/// GET /songs/:name
pub async fn get_song_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Reply, ApiError> {
    let e = ERR.function("get_song_by_name").tag("name", &name);
    match state
        .songs
        .get_by_name(&name)
        .await
        .map_err(|err| service_failure(&e, err))?
    {
        Some(song) => Reply::json(StatusCode::OK, &song).map_err(|err| encode_failure(&e, err)),
        None => Err(ApiError::new(StatusCode::NOT_FOUND, e.not_found())),
    }
}

/// POST /songs/:name
pub async fn create_song(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Reply, ApiError> {
    let e = ERR.function("create_song").tag("name", &name);
    let song: Song = bind_json(&e, &body)?;
    state
        .songs
        .create(&name, song)
        .await
        .map_err(|err| service_failure(&e, err))?;
    Ok(Reply::empty(StatusCode::CREATED))
}

/// PUT /songs/:name
///
/// Creates the song when no song has this name yet.
pub async fn update_song(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Reply, ApiError> {
    let e = ERR.function("update_song").tag("name", &name);
    let song: Song = bind_json(&e, &body)?;
    state
        .songs
        .save(&name, song)
        .await
        .map_err(|err| service_failure(&e, err))?;
    Ok(Reply::empty(StatusCode::CREATED))
}

/// DELETE /songs/:name
pub async fn delete_song(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Reply, ApiError> {
    let e = ERR.function("delete_song").tag("name", &name);
    state
        .songs
        .delete(&name)
        .await
        .map_err(|err| service_failure(&e, err))?;
    Ok(Reply::empty(StatusCode::CREATED))
}
