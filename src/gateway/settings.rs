use super::Gateway;
use crate::config::defaults;
use crate::error::Result;
use crate::types::SiteSettings;

impl Gateway {
    /// Returns the stored settings, or the built-in defaults when no row
    /// exists yet or the store cannot be read.
    pub async fn get_settings(&self) -> SiteSettings {
        match self.run(|store| store.get_settings()).await {
            Ok(Some(settings)) => settings,
            Ok(None) => defaults::site_settings(),
            Err(e) => {
                tracing::warn!("Failed to read site settings, serving defaults: {e}");
                defaults::site_settings()
            }
        }
    }

    /// Upserts the singleton row and returns what was stored.
    pub async fn save_settings(&self, settings: SiteSettings) -> Result<SiteSettings> {
        self.run(move |store| {
            store.upsert_settings(&settings)?;
            Ok(settings)
        })
        .await
    }
}
