use super::validate::require;
use super::{Gateway, today};
use crate::error::{Error, Result};
use crate::types::{Changelog, ChangelogInput};

impl Gateway {
    pub async fn list_changelogs(&self) -> Result<Vec<Changelog>> {
        self.run(|store| store.list_changelogs()).await
    }

    pub async fn create_changelog(&self, input: ChangelogInput) -> Result<Changelog> {
        require(&input.device, "Device")?;
        require(&input.version, "Version")?;

        let changelog = Changelog {
            id: 0,
            device: input.device.trim().to_string(),
            rom_type: input.rom_type,
            version: input.version.trim().to_string(),
            date: input.date.unwrap_or_else(today),
            changelog: input.changelog,
            status: input.status.unwrap_or_default(),
        };

        self.run(move |store| store.create_changelog(&changelog)).await
    }

    pub async fn update_changelog(&self, id: i64, input: ChangelogInput) -> Result<Changelog> {
        require(&input.device, "Device")?;
        require(&input.version, "Version")?;

        self.run(move |store| {
            let mut changelog = store.get_changelog(id)?.ok_or(Error::NotFound)?;

            changelog.device = input.device.trim().to_string();
            changelog.rom_type = input.rom_type;
            changelog.version = input.version.trim().to_string();
            changelog.changelog = input.changelog;
            if let Some(date) = input.date {
                changelog.date = date;
            }
            if let Some(status) = input.status {
                changelog.status = status;
            }

            store.update_changelog(&changelog)?;
            Ok(changelog)
        })
        .await
    }

    pub async fn delete_changelog(&self, id: i64) -> Result<()> {
        self.run(move |store| {
            if store.delete_changelog(id)? {
                Ok(())
            } else {
                Err(Error::NotFound)
            }
        })
        .await
    }
}
