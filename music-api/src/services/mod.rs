//! Domain services
//!
//! Services turn store results into outcomes the HTTP layer can map:
//! found / not found, and a failure that is either the caller's fault
//! ([`ServiceError::Validation`]) or the store's ([`ServiceError::Transport`]).

use music_common::chain::{Chain, Function};
use thiserror::Error;

mod artists;
mod songs;

pub use artists::ArtistService;
pub use songs::SongService;

/// Why a service call failed
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request content is not acceptable; maps to 400
    #[error("validation failure: {0}")]
    Validation(Chain),

    /// The store could not serve the request; maps to 500
    #[error("transport failure: {0}")]
    Transport(Chain),
}

impl ServiceError {
    pub fn chain(&self) -> &Chain {
        match self {
            ServiceError::Validation(chain) | ServiceError::Transport(chain) => chain,
        }
    }

    pub fn into_chain(self) -> Chain {
        match self {
            ServiceError::Validation(chain) | ServiceError::Transport(chain) => chain,
        }
    }
}

/// Reconcile the name in a body with the name in the path
///
/// An empty body name takes the path name; a different one is rejected.
pub(crate) fn resolve_name(e: &Function, path_name: &str, body_name: &mut String) -> Result<(), ServiceError> {
    if body_name.is_empty() {
        *body_name = path_name.to_string();
        return Ok(());
    }
    if body_name.as_str() != path_name {
        return Err(ServiceError::Validation(e.invalid(format!(
            "body name {:?} does not match path name {:?}",
            body_name, path_name
        ))));
    }
    Ok(())
}

/// Lookups answer with exactly one match or nothing
pub(crate) fn single<T>(mut found: Vec<T>) -> Option<T> {
    if found.len() == 1 {
        found.pop()
    } else {
        None
    }
}
