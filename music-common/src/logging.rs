//! Tracing subscriber setup
//!
//! Local and test scopes log at debug level in the human-readable format.
//! Production logs at info level as JSON lines. `RUST_LOG` overrides the
//! level in every scope.

use crate::config::Scope;
use crate::{Error, Result};
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Default level for a scope
pub fn default_level(scope: Scope) -> Level {
    match scope {
        Scope::Local | Scope::Test => Level::DEBUG,
        Scope::Production => Level::INFO,
    }
}

/// Install the global subscriber for `scope`
pub fn init(scope: Scope) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(default_level(scope).into())
        .from_env_lossy();

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match scope {
        Scope::Production => builder.json().try_init(),
        Scope::Local | Scope::Test => builder.try_init(),
    };

    installed.map_err(|e| Error::Config(format!("Failed to install logger: {}", e)))
}
