//! Configuration for the `todomvc` binary.
//!
//! Loads configuration from environment variables with sensible defaults.
//! `main` calls `dotenvy::dotenv()` first, so a `.env` file works too.

use crate::persistence::{InMemoryStorage, LocalStorage, Persistence, RemoteEndpoint};
use crate::router::Router;
use crate::types::Filter;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default local storage file
pub const DEFAULT_STORAGE_PATH: &str = "todomvc-todos.json";

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info,todomvc=debug";

/// Errors raised for invalid configuration values
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A numeric variable did not parse
    #[error("{name} must be a non-negative integer, got {value:?}")]
    InvalidNumber {
        /// Variable name
        name: &'static str,
        /// Raw value
        value: String,
    },

    /// The remote URL is not an http(s) URL
    #[error("TODOMVC_REMOTE_URL must start with http:// or https://, got {0:?}")]
    InvalidRemoteUrl(String),

    /// The initial route is not one the router handles
    #[error("TODOMVC_INITIAL_ROUTE is not a known route: {0:?}")]
    UnknownRoute(String),
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Local storage file; `None` keeps snapshots in memory only
    pub storage_path: Option<PathBuf>,
    /// Base URL of the remote sink, if any
    pub remote_url: Option<String>,
    /// Fallback tracing filter
    pub log_filter: String,
    /// Route applied at startup
    pub initial_route: String,
    /// How long to wait for pending writes on exit, in seconds
    pub shutdown_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_path: Some(PathBuf::from(DEFAULT_STORAGE_PATH)),
            remote_url: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            initial_route: Filter::All.path().to_string(),
            shutdown_timeout_secs: 5,
        }
    }
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through `lookup` instead of the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_path = match lookup("TODOMVC_STORAGE_PATH") {
            Some(path) if path.trim().is_empty() => None,
            Some(path) => Some(PathBuf::from(path)),
            None => defaults.storage_path,
        };

        let remote_url = lookup("TODOMVC_REMOTE_URL")
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());
        if let Some(url) = &remote_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidRemoteUrl(url.clone()));
            }
        }

        let initial_route = lookup("TODOMVC_INITIAL_ROUTE").unwrap_or(defaults.initial_route);
        if Router::new().resolve(&initial_route).is_none() {
            return Err(ConfigError::UnknownRoute(initial_route));
        }

        let shutdown_timeout_secs = match lookup("TODOMVC_SHUTDOWN_TIMEOUT_SECS") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
                name: "TODOMVC_SHUTDOWN_TIMEOUT_SECS",
                value,
            })?,
            None => defaults.shutdown_timeout_secs,
        };

        Ok(Self {
            storage_path,
            remote_url,
            log_filter: lookup("TODOMVC_LOG").unwrap_or(defaults.log_filter),
            initial_route,
            shutdown_timeout_secs,
        })
    }

    /// Shutdown drain timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Persistence sinks described by this configuration
    ///
    /// Local storage comes first so startup hydration prefers it. Without a
    /// storage path an in-memory sink stands in.
    #[must_use]
    pub fn sinks(&self) -> Vec<Arc<dyn Persistence>> {
        let mut sinks: Vec<Arc<dyn Persistence>> = Vec::new();

        match &self.storage_path {
            Some(path) => sinks.push(Arc::new(LocalStorage::new(path.clone()))),
            None => sinks.push(Arc::new(InMemoryStorage::new())),
        }

        if let Some(url) = &self.remote_url {
            sinks.push(Arc::new(RemoteEndpoint::new(url)));
        }

        sinks
    }
}
