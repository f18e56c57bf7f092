//! HTTP API handlers for music-api

use axum::http::StatusCode;
use music_common::chain::Function;
use serde::de::DeserializeOwned;

use crate::services::ServiceError;

pub mod artists;
pub mod health;
pub mod reply;
pub mod songs;

pub use health::health_routes;
pub use reply::{ApiError, Payload, Reply, StatusJson};

/// Map a service failure to a status: validation 400, transport 500
pub(crate) fn service_failure(e: &Function, err: ServiceError) -> ApiError {
    match err {
        ServiceError::Validation(chain) => {
            ApiError::new(StatusCode::BAD_REQUEST, e.wrap(chain, "rejected by service"))
        }
        ServiceError::Transport(chain) => {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.unknown(chain))
        }
    }
}

/// Decode a JSON request body regardless of its content type
pub(crate) fn bind_json<T: DeserializeOwned>(e: &Function, body: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|err| ApiError::new(StatusCode::BAD_REQUEST, e.json(err, "binding")))
}

/// Serialization failure of a reply
pub(crate) fn encode_failure(e: &Function, err: serde_json::Error) -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, e.unknown(err))
}
