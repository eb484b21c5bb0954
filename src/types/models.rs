use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ApplicationStatus, Availability, ChangelogStatus, Role, RomType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: i64,
    pub name: String,
    pub codename: String,
    pub status: Availability,
    pub last_update: NaiveDate,
    /// Filled on read from the ROMs whose `device_codename` matches; never stored.
    #[serde(default)]
    pub roms: Vec<Rom>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rom {
    pub id: i64,
    pub device_codename: String,
    pub rom_type: RomType,
    pub version: String,
    pub size: String,
    pub maintainer: String,
    pub download_url: String,
    pub changelog: String,
    pub notes: String,
    pub status: Availability,
    pub upload_date: NaiveDate,
    pub downloads: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub portfolio: String,
    pub message: String,
    pub cv: Option<String>,
    pub status: ApplicationStatus,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Changelog {
    pub id: i64,
    pub device: String,
    pub rom_type: RomType,
    pub version: String,
    pub date: NaiveDate,
    pub changelog: String,
    pub status: ChangelogStatus,
}

/// The site-wide configuration. Exactly one row exists, keyed on
/// [`SiteSettings::ID`]; missing fields in a payload take the built-in defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteSettings {
    pub site_name: String,
    pub site_description: String,
    pub contact_email: String,
    pub discord_link: String,
    pub telegram_link: String,
    pub download_server: String,
    pub enable_downloads: bool,
    pub enable_team_applications: bool,
}

impl SiteSettings {
    pub const ID: i64 = 1;
}

impl Default for SiteSettings {
    fn default() -> Self {
        crate::config::defaults::site_settings()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub role: Role,
}

/// A server-side login session. The raw bearer token is only ever shown to
/// the client once; the store keeps its Argon2id hash.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: String,
    pub user_id: i64,
    pub token_hash: String,
    pub token_lookup: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
