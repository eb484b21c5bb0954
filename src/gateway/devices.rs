use std::collections::HashMap;

use super::validate::{require, validate_codename, validate_device_name};
use super::{Gateway, today};
use crate::error::{Error, Result};
use crate::types::{Device, DeviceInput, Rom, RomInput};

/// Distributes `roms` onto the devices whose codename they reference,
/// preserving id order.
fn attach_roms(devices: &mut [Device], roms: Vec<Rom>) {
    let mut by_codename: HashMap<String, Vec<Rom>> = HashMap::new();
    for rom in roms {
        by_codename
            .entry(rom.device_codename.clone())
            .or_default()
            .push(rom);
    }
    for device in devices {
        device.roms = by_codename.remove(&device.codename).unwrap_or_default();
    }
}

pub(super) fn validate_rom(input: &RomInput) -> Result<()> {
    require(&input.version, "Version")?;
    require(&input.size, "Size")?;
    require(&input.maintainer, "Maintainer")?;
    require(&input.download_url, "Download URL")?;
    Ok(())
}

impl Gateway {
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        self.run(|store| {
            let mut devices = store.list_devices()?;
            attach_roms(&mut devices, store.list_roms()?);
            Ok(devices)
        })
        .await
    }

    pub async fn get_device(&self, id: i64) -> Result<Device> {
        self.run(move |store| {
            let mut device = store.get_device(id)?.ok_or(Error::NotFound)?;
            device.roms = store.list_device_roms(&device.codename)?;
            Ok(device)
        })
        .await
    }

    pub async fn create_device(&self, input: DeviceInput) -> Result<Device> {
        let name = input.name.trim().to_string();
        let codename = input.codename.trim().to_string();
        validate_device_name(&name)?;
        validate_codename(&codename)?;

        let device = Device {
            id: 0,
            name,
            codename,
            status: input.status.unwrap_or_default(),
            last_update: today(),
            roms: Vec::new(),
        };

        self.run(move |store| store.create_device(&device)).await
    }

    /// Replaces name and status and refreshes `last_update`. The codename is
    /// the join key for ROMs and may not change.
    pub async fn update_device(&self, id: i64, input: DeviceInput) -> Result<Device> {
        let name = input.name.trim().to_string();
        let codename = input.codename.trim().to_string();
        validate_device_name(&name)?;
        let date = today();

        self.run(move |store| {
            let mut device = store.get_device(id)?.ok_or(Error::NotFound)?;
            if codename != device.codename {
                return Err(Error::Conflict("Device codename cannot be changed".into()));
            }

            device.name = name;
            if let Some(status) = input.status {
                device.status = status;
            }
            device.last_update = date;
            store.update_device(&device)?;

            device.roms = store.list_device_roms(&device.codename)?;
            Ok(device)
        })
        .await
    }

    /// Removes the device row only; ROMs that reference its codename stay.
    pub async fn delete_device(&self, id: i64) -> Result<()> {
        self.run(move |store| {
            if store.delete_device(id)? {
                Ok(())
            } else {
                Err(Error::NotFound)
            }
        })
        .await
    }

    pub async fn device_roms(&self, codename: String) -> Result<Vec<Rom>> {
        self.run(move |store| store.list_device_roms(&codename)).await
    }

    /// Adds a ROM under `codename`, then refreshes the device's `last_update`.
    /// The two writes are not atomic: if the refresh fails the ROM is kept
    /// and the failure is only logged.
    pub async fn create_rom(&self, codename: String, input: RomInput) -> Result<Rom> {
        validate_rom(&input)?;
        let date = today();

        self.run(move |store| {
            if store.get_device_by_codename(&codename)?.is_none() {
                return Err(Error::NotFound);
            }

            let rom = store.create_rom(&Rom {
                id: 0,
                device_codename: codename.clone(),
                rom_type: input.rom_type,
                version: input.version.trim().to_string(),
                size: input.size.trim().to_string(),
                maintainer: input.maintainer.trim().to_string(),
                download_url: input.download_url.trim().to_string(),
                changelog: input.changelog,
                notes: input.notes.unwrap_or_default(),
                status: input.status.unwrap_or_default(),
                upload_date: input.upload_date.unwrap_or(date),
                downloads: 0,
            })?;

            if let Err(e) = store.touch_device(&codename, date) {
                tracing::warn!("Failed to refresh last_update for device {codename}: {e}");
            }

            Ok(rom)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::gateway::test_support::gateway;
    use crate::store::Store;
    use crate::types::{Availability, RomType};

    fn device_input(name: &str, codename: &str) -> DeviceInput {
        DeviceInput {
            name: name.to_string(),
            codename: codename.to_string(),
            status: None,
        }
    }

    fn rom_input(version: &str) -> RomInput {
        RomInput {
            rom_type: RomType::Aosp,
            version: version.to_string(),
            size: "1.1 GB".to_string(),
            maintainer: "X".to_string(),
            download_url: "http://x".to_string(),
            changelog: "# 14".to_string(),
            notes: None,
            status: None,
            upload_date: None,
        }
    }

    #[tokio::test]
    async fn test_create_device_defaults() {
        let gateway = gateway();
        let device = gateway
            .create_device(device_input("Pixel 7", "panther"))
            .await
            .unwrap();

        assert!(device.id > 0);
        assert!(device.roms.is_empty());
        assert_eq!(device.status, Availability::Active);
        assert_eq!(device.last_update, today());
    }

    #[tokio::test]
    async fn test_create_device_rejects_bad_codename() {
        let gateway = gateway();
        let result = gateway
            .create_device(device_input("Pixel 7", "pan ther"))
            .await;
        assert!(matches!(result, Err(Error::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_get_missing_device_is_not_found() {
        let gateway = gateway();
        assert!(matches!(
            gateway.get_device(999_999).await,
            Err(Error::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_create_rom_defaults_and_cascade() {
        let gateway = gateway();
        let device = gateway
            .create_device(device_input("Pixel 7", "panther"))
            .await
            .unwrap();

        // Backdate the device so the refresh is observable.
        let mut stale = device.clone();
        stale.last_update = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        gateway.store().update_device(&stale).unwrap();

        let rom = gateway
            .create_rom("panther".to_string(), rom_input("14"))
            .await
            .unwrap();
        assert_eq!(rom.downloads, 0);
        assert_eq!(rom.notes, "");
        assert_eq!(rom.status, Availability::Active);
        assert_eq!(rom.upload_date, today());

        let refreshed = gateway.get_device(device.id).await.unwrap();
        assert_eq!(refreshed.last_update, today());
        assert_eq!(refreshed.roms, vec![rom]);
    }

    #[tokio::test]
    async fn test_create_rom_keeps_supplied_upload_date() {
        let gateway = gateway();
        gateway
            .create_device(device_input("Pixel 7", "panther"))
            .await
            .unwrap();

        let mut input = rom_input("14");
        input.upload_date = NaiveDate::from_ymd_opt(2023, 10, 4);
        let rom = gateway
            .create_rom("panther".to_string(), input)
            .await
            .unwrap();
        assert_eq!(rom.upload_date, NaiveDate::from_ymd_opt(2023, 10, 4).unwrap());
    }

    #[tokio::test]
    async fn test_create_rom_for_unknown_device() {
        let gateway = gateway();
        let result = gateway
            .create_rom("nowhere".to_string(), rom_input("14"))
            .await;
        assert!(matches!(result, Err(Error::NotFound)));
        assert!(gateway.list_roms().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_device_keeps_codename() {
        let gateway = gateway();
        let device = gateway
            .create_device(device_input("Pixel 7", "panther"))
            .await
            .unwrap();

        let renamed = gateway
            .update_device(
                device.id,
                DeviceInput {
                    name: "Google Pixel 7".to_string(),
                    codename: "panther".to_string(),
                    status: Some(Availability::Inactive),
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Google Pixel 7");
        assert_eq!(renamed.status, Availability::Inactive);

        let result = gateway
            .update_device(device.id, device_input("Pixel 7", "cheetah"))
            .await;
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_devices_attaches_roms() {
        let gateway = gateway();
        gateway
            .create_device(device_input("Pixel 7", "panther"))
            .await
            .unwrap();
        gateway
            .create_device(device_input("Pixel 7 Pro", "cheetah"))
            .await
            .unwrap();
        gateway
            .create_rom("cheetah".to_string(), rom_input("14"))
            .await
            .unwrap();

        let devices = gateway.list_devices().await.unwrap();
        assert_eq!(devices.len(), 2);
        assert!(devices[0].roms.is_empty());
        assert_eq!(devices[1].roms.len(), 1);
        assert_eq!(devices, gateway.list_devices().await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_device_keeps_roms() {
        let gateway = gateway();
        let device = gateway
            .create_device(device_input("Pixel 7", "panther"))
            .await
            .unwrap();
        gateway
            .create_rom("panther".to_string(), rom_input("14"))
            .await
            .unwrap();

        gateway.delete_device(device.id).await.unwrap();
        assert_eq!(gateway.device_roms("panther".to_string()).await.unwrap().len(), 1);
        assert!(matches!(
            gateway.delete_device(device.id).await,
            Err(Error::NotFound)
        ));
    }
}
