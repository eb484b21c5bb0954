//! Fallback payloads served when the store has no row yet.

use crate::types::SiteSettings;

pub const SITE_NAME: &str = "SleepOS";
pub const SITE_DESCRIPTION: &str =
    "A lightweight, battery-friendly custom ROM for Android devices.";
pub const CONTACT_EMAIL: &str = "team@sleepos.org";

/// Settings returned by `GET /settings` before an admin has saved any.
#[must_use]
pub fn site_settings() -> SiteSettings {
    SiteSettings {
        site_name: SITE_NAME.to_string(),
        site_description: SITE_DESCRIPTION.to_string(),
        contact_email: CONTACT_EMAIL.to_string(),
        discord_link: String::new(),
        telegram_link: String::new(),
        download_server: String::new(),
        enable_downloads: true,
        enable_team_applications: true,
    }
}

pub const ADMIN_EMAIL: &str = "admin@sleepos.org";
pub const SESSION_TTL_HOURS: i64 = 12;
