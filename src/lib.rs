//! # SleepOS
//!
//! Back-office API for the SleepOS ROM website, usable both as a standalone
//! binary and as a library.
//!
//! ## Library Usage
//!
//! ```toml
//! [dependencies]
//! sleepos = { version = "0.1", default-features = false }
//! ```
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sleepos::config::StoreConfig;
//! use sleepos::server::{AppState, create_router};
//!
//! let store = StoreConfig::new("sqlite://./data/sleepos.db", "local");
//! let state = Arc::new(AppState::new(store, chrono::Duration::hours(12)));
//! let router = create_router(state);
//! // Serve with axum...
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): Includes the admin CLI module. Disable with
//!   `default-features = false`.

pub mod auth;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod server;
pub mod store;
pub mod types;
