use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Connection settings for the relational store. Both values are required;
/// without them every API route answers with a configuration error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub url: Option<String>,
    pub key: Option<String>,
}

/// Which store implementation a URL selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// A PostgREST-compatible hosted Postgres endpoint.
    Remote { url: String, key: String },
    /// A local SQLite file, or `:memory:`.
    Sqlite(PathBuf),
}

impl StoreConfig {
    #[must_use]
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            key: Some(key.into()),
        }
    }

    pub fn backend(&self) -> Result<StoreBackend> {
        let url = non_empty(self.url.as_deref())
            .ok_or_else(|| Error::Config("store URL is not set".into()))?;
        let key = non_empty(self.key.as_deref())
            .ok_or_else(|| Error::Config("store access key is not set".into()))?;

        if url.starts_with("https://") || url.starts_with("http://") {
            return Ok(StoreBackend::Remote {
                url: url.trim_end_matches('/').to_string(),
                key: key.to_string(),
            });
        }

        let path = url
            .strip_prefix("sqlite://")
            .or_else(|| url.strip_prefix("sqlite:"))
            .unwrap_or(url);
        Ok(StoreBackend::Sqlite(PathBuf::from(path)))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
