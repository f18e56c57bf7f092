//! # Music Common Library
//!
//! Shared code for the music API:
//! - Entity models (songs, artists)
//! - Error chain used for structured request diagnostics
//! - Persistence capability and its SQLite adapter
//! - Configuration loading and logging setup

pub mod chain;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod persist;

pub use chain::{Chain, Component, Function, Package};
pub use config::{Config, Scope};
pub use error::{Error, Result};
pub use models::{Artist, Song};
