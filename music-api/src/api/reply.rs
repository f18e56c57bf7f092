//! Turning handler outcomes into HTTP responses
//!
//! A handler answers with `Result<Reply, ApiError>`: a status plus an
//! optional payload, or a status plus an error chain.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use music_common::Chain;
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};

/// Body of a successful reply
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    None,
    Text(String),
    Json(serde_json::Value),
}

/// Successful handler outcome
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub payload: Payload,
}

impl Reply {
    pub fn new(status: StatusCode, payload: Payload) -> Self {
        Self { status, payload }
    }

    /// Status with no body (serialized as `null`)
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, Payload::None)
    }

    /// Plain text, sent wrapped in a status envelope
    pub fn text(status: StatusCode, text: impl Into<String>) -> Self {
        Self::new(status, Payload::Text(text.into()))
    }

    /// Redirect to `url`
    pub fn redirect(url: impl Into<String>) -> Self {
        Self::text(StatusCode::FOUND, url)
    }

    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(status, Payload::Json(serde_json::to_value(value)?)))
    }
}

/// Envelope used to report a plain string to the caller
#[derive(Debug, Serialize)]
pub struct StatusJson {
    pub data: StatusData,
}

#[derive(Debug, Serialize)]
pub struct StatusData {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: StatusAttributes,
}

#[derive(Debug, Serialize)]
pub struct StatusAttributes {
    pub status: String,
}

impl StatusJson {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            data: StatusData {
                id: id.into(),
                kind: "status".to_string(),
                attributes: StatusAttributes {
                    status: status.into(),
                },
            },
        }
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.payload {
            Payload::Text(url) if self.status == StatusCode::FOUND => {
                (StatusCode::FOUND, [(header::LOCATION, url)]).into_response()
            }
            Payload::Text(text) => (self.status, Json(StatusJson::new(text, "ok"))).into_response(),
            Payload::Json(value) => (self.status, Json(value)).into_response(),
            Payload::None => (self.status, Json(serde_json::Value::Null)).into_response(),
        }
    }
}

/// Failed handler outcome
///
/// The chain is logged in full; the caller only gets its external message.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub chain: Chain,
}

impl ApiError {
    pub fn new(status: StatusCode, chain: Chain) -> Self {
        Self { status, chain }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status.as_u16(), self.chain)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let external = self.chain.external();
        let code = self.status.as_u16();

        if self.status.is_server_error() {
            error!(error = %self.chain, external, code, "Error in API");
        } else {
            info!(error = %self.chain, external, code, "Error in API");
        }

        (self.status, Json(json!({ "error": external }))).into_response()
    }
}
