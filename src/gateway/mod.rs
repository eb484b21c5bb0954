//! Typed, asynchronous entity operations over a [`Store`].
//!
//! Every operation runs its store calls on the blocking pool, applies the
//! defaulting rules for omitted fields and reports failures as
//! [`Error`] variants that the HTTP layer classifies.

mod applications;
mod changelogs;
mod devices;
mod roms;
mod settings;
mod users;
mod validate;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::error::{Error, Result};
use crate::store::Store;

pub use users::IssuedSession;

#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn Store>,
}

impl Gateway {
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Runs `op` against the store on the blocking pool.
    async fn run<T, F>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&dyn Store) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| Error::Task(e.to_string()))?
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
