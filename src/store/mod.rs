mod rest;
mod schema;
mod sqlite;

use std::sync::Arc;

use chrono::NaiveDate;

pub use rest::RestStore;
pub use sqlite::SqliteStore;

use crate::config::{StoreBackend, StoreConfig};
use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
///
/// `create_*` methods ignore the `id` of the record they are given and return
/// the persisted row with its assigned id. `update_*` methods return
/// [`Error::NotFound`](crate::error::Error::NotFound) when no row matched.
/// Lists are ordered by ascending id.
pub trait Store: Send + Sync {
    fn initialize(&self) -> Result<()>;

    // Device operations
    fn list_devices(&self) -> Result<Vec<Device>>;
    fn get_device(&self, id: i64) -> Result<Option<Device>>;
    fn get_device_by_codename(&self, codename: &str) -> Result<Option<Device>>;
    fn create_device(&self, device: &Device) -> Result<Device>;
    fn update_device(&self, device: &Device) -> Result<()>;
    fn delete_device(&self, id: i64) -> Result<bool>;
    fn touch_device(&self, codename: &str, date: NaiveDate) -> Result<()>;

    // ROM operations
    fn list_roms(&self) -> Result<Vec<Rom>>;
    fn list_device_roms(&self, codename: &str) -> Result<Vec<Rom>>;
    fn get_rom(&self, id: i64) -> Result<Option<Rom>>;
    fn create_rom(&self, rom: &Rom) -> Result<Rom>;
    fn update_rom(&self, rom: &Rom) -> Result<()>;
    fn delete_rom(&self, id: i64) -> Result<bool>;
    fn increment_rom_downloads(&self, id: i64) -> Result<bool>;

    // Application operations
    fn list_applications(&self) -> Result<Vec<Application>>;
    fn get_application(&self, id: i64) -> Result<Option<Application>>;
    fn create_application(&self, application: &Application) -> Result<Application>;
    fn update_application(&self, application: &Application) -> Result<()>;

    // Changelog operations
    fn list_changelogs(&self) -> Result<Vec<Changelog>>;
    fn get_changelog(&self, id: i64) -> Result<Option<Changelog>>;
    fn create_changelog(&self, changelog: &Changelog) -> Result<Changelog>;
    fn update_changelog(&self, changelog: &Changelog) -> Result<()>;
    fn delete_changelog(&self, id: i64) -> Result<bool>;

    // Site settings (singleton keyed on SiteSettings::ID)
    fn get_settings(&self) -> Result<Option<SiteSettings>>;
    fn upsert_settings(&self, settings: &SiteSettings) -> Result<()>;

    // User operations
    fn get_user(&self, id: i64) -> Result<Option<User>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    fn first_user(&self) -> Result<Option<User>>;
    fn create_user(&self, user: &User) -> Result<User>;
    fn update_user(&self, user: &User) -> Result<()>;

    // Session operations
    fn create_session(&self, session: &Session) -> Result<()>;
    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>>;
    fn delete_session(&self, id: &str) -> Result<bool>;
    fn delete_user_sessions(&self, user_id: i64) -> Result<()>;
}

/// Builds the store selected by `config`. Fails with a configuration error
/// when the URL or key is missing.
pub fn connect(config: &StoreConfig) -> Result<Arc<dyn Store>> {
    match config.backend()? {
        StoreBackend::Remote { url, key } => Ok(Arc::new(RestStore::new(url, key))),
        StoreBackend::Sqlite(path) => {
            let store = SqliteStore::new(&path)?;
            store.initialize()?;
            Ok(Arc::new(store))
        }
    }
}
