pub mod defaults;
mod server;
mod store;

use std::fs;
use std::path::Path;

use serde::Deserialize;

pub use server::ServerConfig;
pub use store::{StoreBackend, StoreConfig};

use crate::error::{Error, Result};

/// Full process configuration. Layers, lowest precedence first: built-in
/// defaults, the TOML file, then environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    /// Overrides values from environment-style variables.
    ///
    /// | Variable                    | Field                        |
    /// |-----------------------------|------------------------------|
    /// | `SLEEPOS_HOST`              | `server.host`                |
    /// | `SLEEPOS_PORT`              | `server.port`                |
    /// | `SLEEPOS_SESSION_TTL_HOURS` | `server.session_ttl_hours`   |
    /// | `STORE_URL`                 | `store.url`                  |
    /// | `STORE_KEY`                 | `store.key`                  |
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SLEEPOS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SLEEPOS_PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| Error::Config(format!("SLEEPOS_PORT is not a valid port: {port}")))?;
        }
        if let Some(hours) = lookup("SLEEPOS_SESSION_TTL_HOURS") {
            self.server.session_ttl_hours = hours.parse().map_err(|_| {
                Error::Config(format!("SLEEPOS_SESSION_TTL_HOURS is not a number: {hours}"))
            })?;
        }
        if let Some(url) = lookup("STORE_URL") {
            self.store.url = Some(url);
        }
        if let Some(key) = lookup("STORE_KEY") {
            self.store.key = Some(key);
        }
        Ok(())
    }
}
