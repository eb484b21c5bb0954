//! Caller-supplied payloads. None of these carry server-assigned fields such
//! as `id` or `downloads`; unknown keys in a request body are ignored.

use chrono::NaiveDate;
use serde::Deserialize;

use super::{ApplicationStatus, Availability, ChangelogStatus, Role, RomType};

/// Body of `POST /devices` and `PUT /devices/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInput {
    pub name: String,
    pub codename: String,
    #[serde(default)]
    pub status: Option<Availability>,
}

/// Body of `POST /devices/{codename}/roms` and `PUT /roms/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RomInput {
    pub rom_type: RomType,
    pub version: String,
    pub size: String,
    pub maintainer: String,
    pub download_url: String,
    pub changelog: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub status: Option<Availability>,
    #[serde(default)]
    pub upload_date: Option<NaiveDate>,
}

/// Body of the public team application form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationInput {
    pub name: String,
    pub email: String,
    pub role: String,
    pub portfolio: String,
    pub message: String,
    #[serde(default)]
    pub cv: Option<String>,
}

/// Admin edit of an application; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub portfolio: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub cv: Option<String>,
    #[serde(default)]
    pub status: Option<ApplicationStatus>,
}

/// Body of `POST /changelogs` and `PUT /changelogs/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangelogInput {
    pub device: String,
    pub rom_type: RomType,
    pub version: String,
    pub changelog: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<ChangelogStatus>,
}

/// Body of `PUT /user`. A new password is hashed before it reaches the store.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
}
