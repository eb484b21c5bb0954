use super::Gateway;
use super::devices::validate_rom;
use crate::error::{Error, Result};
use crate::types::{Rom, RomInput};

impl Gateway {
    pub async fn list_roms(&self) -> Result<Vec<Rom>> {
        self.run(|store| store.list_roms()).await
    }

    /// Edits a ROM in place. The owning device and the download counter are
    /// not caller-editable; omitted optional fields keep their stored value.
    pub async fn update_rom(&self, id: i64, input: RomInput) -> Result<Rom> {
        validate_rom(&input)?;

        self.run(move |store| {
            let mut rom = store.get_rom(id)?.ok_or(Error::NotFound)?;

            rom.rom_type = input.rom_type;
            rom.version = input.version.trim().to_string();
            rom.size = input.size.trim().to_string();
            rom.maintainer = input.maintainer.trim().to_string();
            rom.download_url = input.download_url.trim().to_string();
            rom.changelog = input.changelog;
            if let Some(notes) = input.notes {
                rom.notes = notes;
            }
            if let Some(status) = input.status {
                rom.status = status;
            }
            if let Some(upload_date) = input.upload_date {
                rom.upload_date = upload_date;
            }

            store.update_rom(&rom)?;
            Ok(rom)
        })
        .await
    }

    pub async fn delete_rom(&self, id: i64) -> Result<()> {
        self.run(move |store| {
            if store.delete_rom(id)? {
                Ok(())
            } else {
                Err(Error::NotFound)
            }
        })
        .await
    }

    /// Counts one download and returns the updated ROM.
    pub async fn record_download(&self, id: i64) -> Result<Rom> {
        self.run(move |store| {
            if !store.increment_rom_downloads(id)? {
                return Err(Error::NotFound);
            }
            store.get_rom(id)?.ok_or(Error::NotFound)
        })
        .await
    }
}
