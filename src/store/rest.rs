//! Store backed by a hosted Postgres service exposing a PostgREST interface
//! at `{base_url}/rest/v1/{table}`.
//!
//! Models travel with camelCase keys over the public API while the remote
//! tables use snake_case columns, so rows are re-keyed on the way in and out.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::Store;
use crate::error::{Error, Result};
use crate::types::*;

const RETURN_ROWS: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=minimal";

pub struct RestStore {
    base_url: String,
    key: String,
    /// Built on first use, from inside the blocking pool.
    client: OnceLock<Client>,
}

#[derive(Debug, Serialize, Deserialize)]
struct UserRow {
    #[serde(default, skip_serializing)]
    id: i64,
    email: String,
    password_hash: String,
    role: Role,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            role: row.role,
        }
    }
}

impl From<&User> for UserRow {
    fn from(user: &User) -> Self {
        UserRow {
            id: user.id,
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionRow {
    id: String,
    user_id: i64,
    token_hash: String,
    token_lookup: String,
    created_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Session {
            id: row.id,
            user_id: row.user_id,
            token_hash: row.token_hash,
            token_lookup: row.token_lookup,
            created_at: row.created_at,
            expires_at: row.expires_at,
        }
    }
}

impl From<&Session> for SessionRow {
    fn from(session: &Session) -> Self {
        SessionRow {
            id: session.id.clone(),
            user_id: session.user_id,
            token_hash: session.token_hash.clone(),
            token_lookup: session.token_lookup.clone(),
            created_at: session.created_at,
            expires_at: session.expires_at,
        }
    }
}

impl RestStore {
    #[must_use]
    pub fn new(base_url: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key: key.into(),
            client: OnceLock::new(),
        }
    }

    fn client(&self) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = Client::builder().build()?;
        Ok(self.client.get_or_init(|| client))
    }

    fn url(&self, table: &str, query: &[(&str, String)]) -> String {
        build_url(&self.base_url, table, query)
    }

    fn send(&self, request: RequestBuilder, conflict: &str) -> Result<Response> {
        let response = request
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().unwrap_or_default();
        if status == StatusCode::CONFLICT {
            return Err(Error::Conflict(conflict.to_string()));
        }
        Err(Error::RemoteStatus {
            status: status.as_u16(),
            message,
        })
    }

    fn fetch(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<Value>> {
        let request = self.client()?.get(self.url(table, query));
        Ok(self.send(request, "Conflicting read")?.json()?)
    }

    fn insert(&self, table: &str, body: Value, conflict: &str) -> Result<Value> {
        let request = self
            .client()?
            .post(self.url(table, &[]))
            .header("Prefer", RETURN_ROWS)
            .json(&body);
        let rows: Vec<Value> = self.send(request, conflict)?.json()?;
        rows.into_iter().next().ok_or_else(|| Error::RemoteStatus {
            status: 200,
            message: format!("insert into {table} returned no row"),
        })
    }

    /// Applies `body` to every row matching `query`; returns how many matched.
    fn patch(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: Value,
        conflict: &str,
    ) -> Result<usize> {
        let request = self
            .client()?
            .patch(self.url(table, query))
            .header("Prefer", RETURN_ROWS)
            .json(&body);
        let rows: Vec<Value> = self.send(request, conflict)?.json()?;
        Ok(rows.len())
    }

    fn remove(&self, table: &str, query: &[(&str, String)]) -> Result<usize> {
        let request = self
            .client()?
            .delete(self.url(table, query))
            .header("Prefer", RETURN_ROWS);
        let rows: Vec<Value> = self.send(request, "Record is still referenced")?.json()?;
        Ok(rows.len())
    }

    fn list<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let mut query = vec![("select", "*".to_string()), ("order", "id.asc".to_string())];
        query.extend(filters.iter().cloned());
        self.fetch(table, &query)?.into_iter().map(decode).collect()
    }

    fn find<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Option<T>> {
        Ok(self.list(table, filters)?.into_iter().next())
    }

    fn update_by_id<T: Serialize>(
        &self,
        table: &str,
        id: i64,
        record: &T,
        conflict: &str,
    ) -> Result<()> {
        let matched = self.patch(table, &[("id", eq(id))], encode(record)?, conflict)?;
        if matched == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_by_id(&self, table: &str, id: i64) -> Result<bool> {
        Ok(self.remove(table, &[("id", eq(id))])? > 0)
    }
}

/// Builds `{base}/rest/v1/{table}?k=v&...` with percent-encoded values.
fn build_url(base: &str, table: &str, query: &[(&str, String)]) -> String {
    let mut url = format!("{base}/rest/v1/{table}");
    for (i, (key, value)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

fn snake_to_camel(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

fn rekey(value: Value, convert: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (convert(&k), v))
                .collect::<Map<String, Value>>(),
        ),
        other => other,
    }
}

/// Serializes a model into a column map, dropping server-owned and derived keys.
fn encode<T: Serialize>(record: &T) -> Result<Value> {
    let mut value = rekey(serde_json::to_value(record)?, camel_to_snake);
    if let Value::Object(map) = &mut value {
        map.remove("id");
        map.remove("roms");
    }
    Ok(value)
}

fn decode<T: DeserializeOwned>(row: Value) -> Result<T> {
    Ok(serde_json::from_value(rekey(row, snake_to_camel))?)
}

fn decode_raw<T: DeserializeOwned>(row: Value) -> Result<T> {
    Ok(serde_json::from_value(row)?)
}

impl Store for RestStore {
    /// Tables on the hosted service are provisioned out of band.
    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    // Device operations

    fn list_devices(&self) -> Result<Vec<Device>> {
        self.list("devices", &[])
    }

    fn get_device(&self, id: i64) -> Result<Option<Device>> {
        self.find("devices", &[("id", eq(id))])
    }

    fn get_device_by_codename(&self, codename: &str) -> Result<Option<Device>> {
        self.find("devices", &[("codename", eq(codename))])
    }

    fn create_device(&self, device: &Device) -> Result<Device> {
        let row = self.insert("devices", encode(device)?, "Device codename already exists")?;
        decode(row)
    }

    fn update_device(&self, device: &Device) -> Result<()> {
        self.update_by_id("devices", device.id, device, "Device codename already exists")
    }

    fn delete_device(&self, id: i64) -> Result<bool> {
        self.delete_by_id("devices", id)
    }

    fn touch_device(&self, codename: &str, date: NaiveDate) -> Result<()> {
        let matched = self.patch(
            "devices",
            &[("codename", eq(codename))],
            json!({ "last_update": date }),
            "Device update conflicts with an existing record",
        )?;
        if matched == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // ROM operations

    fn list_roms(&self) -> Result<Vec<Rom>> {
        self.list("roms", &[])
    }

    fn list_device_roms(&self, codename: &str) -> Result<Vec<Rom>> {
        self.list("roms", &[("device_codename", eq(codename))])
    }

    fn get_rom(&self, id: i64) -> Result<Option<Rom>> {
        self.find("roms", &[("id", eq(id))])
    }

    fn create_rom(&self, rom: &Rom) -> Result<Rom> {
        decode(self.insert("roms", encode(rom)?, "ROM already exists")?)
    }

    fn update_rom(&self, rom: &Rom) -> Result<()> {
        self.update_by_id("roms", rom.id, rom, "ROM already exists")
    }

    fn delete_rom(&self, id: i64) -> Result<bool> {
        self.delete_by_id("roms", id)
    }

    /// Read-modify-write; concurrent downloads may collapse into one increment.
    fn increment_rom_downloads(&self, id: i64) -> Result<bool> {
        let Some(rom) = self.get_rom(id)? else {
            return Ok(false);
        };
        let matched = self.patch(
            "roms",
            &[("id", eq(id))],
            json!({ "downloads": rom.downloads + 1 }),
            "ROM update conflicts with an existing record",
        )?;
        Ok(matched > 0)
    }

    // Application operations

    fn list_applications(&self) -> Result<Vec<Application>> {
        self.list("applications", &[])
    }

    fn get_application(&self, id: i64) -> Result<Option<Application>> {
        self.find("applications", &[("id", eq(id))])
    }

    fn create_application(&self, application: &Application) -> Result<Application> {
        decode(self.insert("applications", encode(application)?, "Application already exists")?)
    }

    fn update_application(&self, application: &Application) -> Result<()> {
        self.update_by_id(
            "applications",
            application.id,
            application,
            "Application conflicts with an existing record",
        )
    }

    // Changelog operations

    fn list_changelogs(&self) -> Result<Vec<Changelog>> {
        self.list("changelogs", &[])
    }

    fn get_changelog(&self, id: i64) -> Result<Option<Changelog>> {
        self.find("changelogs", &[("id", eq(id))])
    }

    fn create_changelog(&self, changelog: &Changelog) -> Result<Changelog> {
        decode(self.insert("changelogs", encode(changelog)?, "Changelog already exists")?)
    }

    fn update_changelog(&self, changelog: &Changelog) -> Result<()> {
        self.update_by_id(
            "changelogs",
            changelog.id,
            changelog,
            "Changelog conflicts with an existing record",
        )
    }

    fn delete_changelog(&self, id: i64) -> Result<bool> {
        self.delete_by_id("changelogs", id)
    }

    // Site settings

    fn get_settings(&self) -> Result<Option<SiteSettings>> {
        self.find("settings", &[("id", eq(SiteSettings::ID))])
    }

    fn upsert_settings(&self, settings: &SiteSettings) -> Result<()> {
        let mut body = encode(settings)?;
        if let Value::Object(map) = &mut body {
            map.insert("id".to_string(), json!(SiteSettings::ID));
        }
        let request = self
            .client()?
            .post(self.url("settings", &[("on_conflict", "id".to_string())]))
            .header("Prefer", MERGE_DUPLICATES)
            .json(&body);
        self.send(request, "Settings conflict with the stored row")?;
        Ok(())
    }

    // User operations

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        let rows = self.fetch("users", &[("select", "*".to_string()), ("id", eq(id))])?;
        rows.into_iter()
            .next()
            .map(|row| decode_raw::<UserRow>(row).map(User::from))
            .transpose()
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let rows = self.fetch("users", &[("select", "*".to_string()), ("email", eq(email))])?;
        rows.into_iter()
            .next()
            .map(|row| decode_raw::<UserRow>(row).map(User::from))
            .transpose()
    }

    fn first_user(&self) -> Result<Option<User>> {
        let rows = self.fetch(
            "users",
            &[
                ("select", "*".to_string()),
                ("order", "id.asc".to_string()),
                ("limit", "1".to_string()),
            ],
        )?;
        rows.into_iter()
            .next()
            .map(|row| decode_raw::<UserRow>(row).map(User::from))
            .transpose()
    }

    fn create_user(&self, user: &User) -> Result<User> {
        let body = serde_json::to_value(UserRow::from(user))?;
        let row = self.insert("users", body, "Email already in use")?;
        Ok(decode_raw::<UserRow>(row)?.into())
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let body = serde_json::to_value(UserRow::from(user))?;
        let matched = self.patch("users", &[("id", eq(user.id))], body, "Email already in use")?;
        if matched == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Session operations

    fn create_session(&self, session: &Session) -> Result<()> {
        let body = serde_json::to_value(SessionRow::from(session))?;
        match self.insert("sessions", body, "session lookup collision") {
            Ok(_) => Ok(()),
            Err(Error::Conflict(_)) => Err(Error::TokenLookupCollision),
            Err(e) => Err(e),
        }
    }

    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>> {
        let rows = self.fetch(
            "sessions",
            &[("select", "*".to_string()), ("token_lookup", eq(lookup))],
        )?;
        rows.into_iter()
            .next()
            .map(|row| decode_raw::<SessionRow>(row).map(Session::from))
            .transpose()
    }

    fn delete_session(&self, id: &str) -> Result<bool> {
        Ok(self.remove("sessions", &[("id", eq(id))])? > 0)
    }

    fn delete_user_sessions(&self, user_id: i64) -> Result<()> {
        self.remove("sessions", &[("user_id", eq(user_id))])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_url_encodes_values() {
        let url = build_url(
            "https://db.example.com",
            "roms",
            &[
                ("select", "*".to_string()),
                ("device_codename", eq("my device")),
            ],
        );
        assert_eq!(
            url,
            "https://db.example.com/rest/v1/roms?select=%2A&device_codename=eq.my%20device"
        );
    }

    #[test]
    fn test_build_url_without_query() {
        assert_eq!(
            build_url("https://db.example.com", "devices", &[]),
            "https://db.example.com/rest/v1/devices"
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let store = RestStore::new("https://db.example.com/", "key");
        assert_eq!(store.url("users", &[]), "https://db.example.com/rest/v1/users");
    }

    #[test]
    fn test_key_case_conversion() {
        assert_eq!(camel_to_snake("deviceCodename"), "device_codename");
        assert_eq!(camel_to_snake("enableTeamApplications"), "enable_team_applications");
        assert_eq!(snake_to_camel("last_update"), "lastUpdate");
        assert_eq!(snake_to_camel("id"), "id");
    }

    #[test]
    fn test_encode_drops_server_owned_keys() {
        let device = Device {
            id: 7,
            name: "Pixel 7".to_string(),
            codename: "panther".to_string(),
            status: Availability::Active,
            last_update: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            roms: Vec::new(),
        };
        let body = encode(&device).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "Pixel 7",
                "codename": "panther",
                "status": "Active",
                "last_update": "2024-01-02",
            })
        );
    }

    #[test]
    fn test_decode_remote_row() {
        let row = json!({
            "id": 3,
            "device_codename": "panther",
            "rom_type": "AOSP",
            "version": "14",
            "size": "1.1 GB",
            "maintainer": "X",
            "download_url": "http://x",
            "changelog": "# 14",
            "notes": "",
            "status": "Active",
            "upload_date": "2024-05-01",
            "downloads": 12,
        });
        let rom: Rom = decode(row).unwrap();
        assert_eq!(rom.id, 3);
        assert_eq!(rom.rom_type, RomType::Aosp);
        assert_eq!(rom.downloads, 12);
    }

    #[test]
    fn test_user_row_keeps_password_hash() {
        let row = json!({
            "id": 1,
            "email": "admin@example.com",
            "password_hash": "$argon2id$v=19$stub",
            "role": "admin",
        });
        let user: User = decode_raw::<UserRow>(row).unwrap().into();
        assert_eq!(user.password_hash, "$argon2id$v=19$stub");
        assert_eq!(user.role, Role::Admin);

        let body = serde_json::to_value(UserRow::from(&user)).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["password_hash"], "$argon2id$v=19$stub");
    }
}
