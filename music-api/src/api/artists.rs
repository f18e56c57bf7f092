//! Artist endpoints

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
};
use music_common::chain::{Component, Package};
use music_common::Artist;

use super::{bind_json, encode_failure, service_failure, ApiError, Reply};
use crate::AppState;

const ERR: Component = Package::new("artists").component("api");

/// GET /artists
pub async fn get_artists(State(state): State<AppState>) -> Result<Reply, ApiError> {
    let e = ERR.function("get_artists");
    let artists = state
        .artists
        .list()
        .await
        .map_err(|err| service_failure(&e, err))?;
    Reply::json(StatusCode::OK, &artists).map_err(|err| encode_failure(&e, err))
}

/// GET /artists/:name
pub async fn get_artist_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Reply, ApiError> {
    let e = ERR.function("get_artist_by_name").tag("name", &name);
    let artist = state
        .artists
        .get_by_name(&name)
        .await
        .map_err(|err| service_failure(&e, err))?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, e.not_found()))?;
    Reply::json(StatusCode::OK, &artist).map_err(|err| encode_failure(&e, err))
}

/// POST /artists/:name
pub async fn create_artist(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Reply, ApiError> {
    let e = ERR.function("create_artist").tag("name", &name);
    let artist: Artist = bind_json(&e, &body)?;
    state
        .artists
        .create(&name, artist)
        .await
        .map_err(|err| service_failure(&e, err))?;
    Ok(Reply::empty(StatusCode::CREATED))
}

/// DELETE /artists/:name
pub async fn delete_artist(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Reply, ApiError> {
    let e = ERR.function("delete_artist").tag("name", &name);
    state
        .artists
        .delete(&name)
        .await
        .map_err(|err| service_failure(&e, err))?;
    Ok(Reply::empty(StatusCode::CREATED))
}
