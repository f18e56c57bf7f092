//! music-api library - songs and artists over HTTP
//!
//! Routes map onto the song and artist services; the services run their SQL
//! through whatever [`Querier`] the state was built with.

use axum::body::Body;
use axum::http::Request;
use axum::routing::get;
use axum::Router;
use music_common::persist::Querier;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod api;
pub mod db;
pub mod services;

use services::{ArtistService, SongService};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub songs: SongService,
    pub artists: ArtistService,
}

impl AppState {
    /// Build every service on top of one querier
    pub fn new(db: Arc<dyn Querier>) -> Self {
        Self {
            songs: SongService::new(db.clone()),
            artists: ArtistService::new(db),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let songs = Router::new()
        .route("/songs", get(api::songs::get_songs))
        .route(
            "/songs/:name",
            get(api::songs::get_song_by_name)
                .post(api::songs::create_song)
                .put(api::songs::update_song)
                .delete(api::songs::delete_song),
        );

    let artists = Router::new()
        .route("/artists", get(api::artists::get_artists))
        .route(
            "/artists/:name",
            get(api::artists::get_artist_by_name)
                .post(api::artists::create_artist)
                .delete(api::artists::delete_artist),
        );

    Router::new()
        .merge(songs)
        .merge(artists)
        .merge(api::health_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
}
