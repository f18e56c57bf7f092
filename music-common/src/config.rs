//! Configuration loading
//!
//! A deployment profile ([`Scope`]) supplies defaults for port and database.
//! Settings are then resolved in the following priority order:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables (`PORT`, `DATABASE_URL`)
//! 3. TOML config file
//! 4. Scope defaults (fallback)
//!
//! The resulting [`Config`] is built once at startup and passed down
//! explicitly.

use crate::persist::PoolLimits;
use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable selecting the deployment profile
pub const SCOPE_ENV: &str = "SCOPE";
/// Environment variable carrying the deployed version
pub const VERSION_ENV: &str = "VERSION";
pub const PORT_ENV: &str = "PORT";
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Deployment profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Local,
    Test,
    Production,
}

impl Scope {
    /// Parse a raw scope value, reporting whether it named a job
    ///
    /// Any value starting with `job` is a production job. Unknown values
    /// fall back to local.
    pub fn parse(raw: &str) -> (Scope, bool) {
        if raw.starts_with("job") {
            return (Scope::Production, true);
        }
        let scope = match raw {
            "production" => Scope::Production,
            "test" => Scope::Test,
            _ => Scope::Local,
        };
        (scope, false)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Local => "local",
            Scope::Test => "test",
            Scope::Production => "production",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Application-wide configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub scope: Scope,
    pub productive: bool,
    pub job: bool,
    pub port: u16,
    pub app_version: String,
    pub database_url: String,
    pub max_connections: u32,
}

/// Values read from the TOML config file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub max_connections: Option<u32>,
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub scope: Option<String>,
    pub config_file: Option<PathBuf>,
    pub port: Option<u16>,
    pub database_url: Option<String>,
}

impl Config {
    /// Defaults for a raw scope value
    pub fn for_scope(raw_scope: &str, version: Option<&str>) -> Self {
        let (scope, job) = Scope::parse(raw_scope);
        let version = version.unwrap_or_default().to_string();

        match scope {
            Scope::Production => Config {
                scope,
                productive: true,
                job,
                port: 8080,
                app_version: version,
                database_url: "sqlite://music.db?mode=rwc".to_string(),
                max_connections: PoolLimits::default().max_connections,
            },
            Scope::Test => Config {
                scope,
                productive: false,
                job,
                port: 8080,
                app_version: version,
                database_url: "sqlite://music-test.db?mode=rwc".to_string(),
                max_connections: PoolLimits::default().max_connections,
            },
            Scope::Local => Config {
                scope,
                productive: false,
                job,
                port: 3000,
                app_version: "local".to_string(),
                database_url: "sqlite://music.db?mode=rwc".to_string(),
                max_connections: PoolLimits::default().max_connections,
            },
        }
    }

    /// Resolve the full configuration from all sources
    pub fn load(overrides: &Overrides) -> Result<Self> {
        let raw_scope = overrides
            .scope
            .clone()
            .or_else(|| std::env::var(SCOPE_ENV).ok())
            .unwrap_or_default();
        let version = std::env::var(VERSION_ENV).ok();

        let mut config = Config::for_scope(&raw_scope, version.as_deref());

        if let Some(path) = &overrides.config_file {
            config.apply_file(&read_config_file(path)?);
        }

        config.apply_env()?;

        if let Some(port) = overrides.port {
            config.port = port;
        }
        if let Some(url) = &overrides.database_url {
            config.database_url = url.clone();
        }

        if config.max_connections == 0 {
            return Err(Error::Config("max_connections must be at least 1".to_string()));
        }

        Ok(config)
    }

    pub fn apply_file(&mut self, file: &FileConfig) {
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(url) = &file.database_url {
            self.database_url = url.clone();
        }
        if let Some(max) = file.max_connections {
            self.max_connections = max;
        }
    }

    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(port) = std::env::var(PORT_ENV) {
            self.port = port
                .parse()
                .map_err(|_| Error::Config(format!("{} is not a valid port: {}", PORT_ENV, port)))?;
        }
        if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
            self.database_url = url;
        }
        Ok(())
    }

    pub fn pool_limits(&self) -> PoolLimits {
        PoolLimits {
            max_connections: self.max_connections,
            ..PoolLimits::default()
        }
    }
}

/// Read a TOML config file
pub fn read_config_file(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}
