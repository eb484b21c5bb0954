use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Params, Row, params};

use super::Store;
use super::schema::SCHEMA;
use crate::error::{Error, Result};
use crate::types::*;

const DEVICE_COLUMNS: &str = "id, name, codename, status, last_update";
const ROM_COLUMNS: &str = "id, device_codename, rom_type, version, size, maintainer, \
     download_url, changelog, notes, status, upload_date, downloads";
const APPLICATION_COLUMNS: &str =
    "id, name, email, role, portfolio, message, cv, status, date";
const CHANGELOG_COLUMNS: &str = "id, device, rom_type, version, date, changelog, status";
const SETTINGS_COLUMNS: &str = "site_name, site_description, contact_email, discord_link, \
     telegram_link, download_server, enable_downloads, enable_team_applications";
const USER_COLUMNS: &str = "id, email, password_hash, role";
const SESSION_COLUMNS: &str = "id, user_id, token_hash, token_lookup, created_at, expires_at";

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens a private in-memory database, mostly useful for tests.
    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn query_list<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let items = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(items)
    }

    fn query_one<T, P: Params>(
        &self,
        sql: &str,
        params: P,
        map: fn(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Option<T>> {
        self.conn()
            .query_row(sql, params, map)
            .optional()
            .map_err(Error::from)
    }

    fn execute_update<P: Params>(&self, sql: &str, params: P) -> Result<()> {
        let rows = self.conn().execute(sql, params)?;
        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn execute_delete(&self, sql: &str, id: i64) -> Result<bool> {
        let rows = self.conn().execute(sql, params![id])?;
        Ok(rows > 0)
    }
}

fn parse_date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap_or_else(|e| {
        tracing::error!("Invalid date in database: '{}' - {}", s, e);
        Utc::now().date_naive()
    })
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Turns a unique-constraint failure into a conflict carrying `message`.
fn constraint_as_conflict(err: rusqlite::Error, message: &str) -> Error {
    match err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation => {
            Error::Conflict(message.to_string())
        }
        e => Error::from(e),
    }
}

fn device_from_row(row: &Row<'_>) -> rusqlite::Result<Device> {
    Ok(Device {
        id: row.get(0)?,
        name: row.get(1)?,
        codename: row.get(2)?,
        status: row.get(3)?,
        last_update: parse_date(&row.get::<_, String>(4)?),
        roms: Vec::new(),
    })
}

fn rom_from_row(row: &Row<'_>) -> rusqlite::Result<Rom> {
    Ok(Rom {
        id: row.get(0)?,
        device_codename: row.get(1)?,
        rom_type: row.get(2)?,
        version: row.get(3)?,
        size: row.get(4)?,
        maintainer: row.get(5)?,
        download_url: row.get(6)?,
        changelog: row.get(7)?,
        notes: row.get(8)?,
        status: row.get(9)?,
        upload_date: parse_date(&row.get::<_, String>(10)?),
        downloads: row.get(11)?,
    })
}

fn application_from_row(row: &Row<'_>) -> rusqlite::Result<Application> {
    Ok(Application {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        role: row.get(3)?,
        portfolio: row.get(4)?,
        message: row.get(5)?,
        cv: row.get(6)?,
        status: row.get(7)?,
        date: parse_date(&row.get::<_, String>(8)?),
    })
}

fn changelog_from_row(row: &Row<'_>) -> rusqlite::Result<Changelog> {
    Ok(Changelog {
        id: row.get(0)?,
        device: row.get(1)?,
        rom_type: row.get(2)?,
        version: row.get(3)?,
        date: parse_date(&row.get::<_, String>(4)?),
        changelog: row.get(5)?,
        status: row.get(6)?,
    })
}

fn settings_from_row(row: &Row<'_>) -> rusqlite::Result<SiteSettings> {
    Ok(SiteSettings {
        site_name: row.get(0)?,
        site_description: row.get(1)?,
        contact_email: row.get(2)?,
        discord_link: row.get(3)?,
        telegram_link: row.get(4)?,
        download_server: row.get(5)?,
        enable_downloads: row.get(6)?,
        enable_team_applications: row.get(7)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        role: row.get(3)?,
    })
}

fn session_from_row(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: row.get(0)?,
        user_id: row.get(1)?,
        token_hash: row.get(2)?,
        token_lookup: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?),
        expires_at: parse_datetime(&row.get::<_, String>(5)?),
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        self.conn().execute_batch(SCHEMA)?;
        Ok(())
    }

    // Device operations

    fn list_devices(&self) -> Result<Vec<Device>> {
        self.query_list(
            &format!("SELECT {DEVICE_COLUMNS} FROM devices ORDER BY id"),
            [],
            device_from_row,
        )
    }

    fn get_device(&self, id: i64) -> Result<Option<Device>> {
        self.query_one(
            &format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE id = ?1"),
            params![id],
            device_from_row,
        )
    }

    fn get_device_by_codename(&self, codename: &str) -> Result<Option<Device>> {
        self.query_one(
            &format!("SELECT {DEVICE_COLUMNS} FROM devices WHERE codename = ?1"),
            params![codename],
            device_from_row,
        )
    }

    fn create_device(&self, device: &Device) -> Result<Device> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO devices (name, codename, status, last_update) VALUES (?1, ?2, ?3, ?4)",
            params![
                device.name,
                device.codename,
                device.status,
                format_date(&device.last_update),
            ],
        )
        .map_err(|e| constraint_as_conflict(e, "Device codename already exists"))?;

        Ok(Device {
            id: conn.last_insert_rowid(),
            roms: Vec::new(),
            ..device.clone()
        })
    }

    fn update_device(&self, device: &Device) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE devices SET name = ?1, codename = ?2, status = ?3, last_update = ?4
                 WHERE id = ?5",
                params![
                    device.name,
                    device.codename,
                    device.status,
                    format_date(&device.last_update),
                    device.id,
                ],
            )
            .map_err(|e| constraint_as_conflict(e, "Device codename already exists"))?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    fn delete_device(&self, id: i64) -> Result<bool> {
        self.execute_delete("DELETE FROM devices WHERE id = ?1", id)
    }

    fn touch_device(&self, codename: &str, date: NaiveDate) -> Result<()> {
        self.execute_update(
            "UPDATE devices SET last_update = ?1 WHERE codename = ?2",
            params![format_date(&date), codename],
        )
    }

    // ROM operations

    fn list_roms(&self) -> Result<Vec<Rom>> {
        self.query_list(
            &format!("SELECT {ROM_COLUMNS} FROM roms ORDER BY id"),
            [],
            rom_from_row,
        )
    }

    fn list_device_roms(&self, codename: &str) -> Result<Vec<Rom>> {
        self.query_list(
            &format!("SELECT {ROM_COLUMNS} FROM roms WHERE device_codename = ?1 ORDER BY id"),
            params![codename],
            rom_from_row,
        )
    }

    fn get_rom(&self, id: i64) -> Result<Option<Rom>> {
        self.query_one(
            &format!("SELECT {ROM_COLUMNS} FROM roms WHERE id = ?1"),
            params![id],
            rom_from_row,
        )
    }

    fn create_rom(&self, rom: &Rom) -> Result<Rom> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO roms (device_codename, rom_type, version, size, maintainer, download_url,
                               changelog, notes, status, upload_date, downloads)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                rom.device_codename,
                rom.rom_type,
                rom.version,
                rom.size,
                rom.maintainer,
                rom.download_url,
                rom.changelog,
                rom.notes,
                rom.status,
                format_date(&rom.upload_date),
                rom.downloads,
            ],
        )?;

        Ok(Rom {
            id: conn.last_insert_rowid(),
            ..rom.clone()
        })
    }

    fn update_rom(&self, rom: &Rom) -> Result<()> {
        self.execute_update(
            "UPDATE roms SET rom_type = ?1, version = ?2, size = ?3, maintainer = ?4,
                 download_url = ?5, changelog = ?6, notes = ?7, status = ?8, upload_date = ?9
             WHERE id = ?10",
            params![
                rom.rom_type,
                rom.version,
                rom.size,
                rom.maintainer,
                rom.download_url,
                rom.changelog,
                rom.notes,
                rom.status,
                format_date(&rom.upload_date),
                rom.id,
            ],
        )
    }

    fn delete_rom(&self, id: i64) -> Result<bool> {
        self.execute_delete("DELETE FROM roms WHERE id = ?1", id)
    }

    fn increment_rom_downloads(&self, id: i64) -> Result<bool> {
        let rows = self.conn().execute(
            "UPDATE roms SET downloads = downloads + 1 WHERE id = ?1",
            params![id],
        )?;
        Ok(rows > 0)
    }

    // Application operations

    fn list_applications(&self) -> Result<Vec<Application>> {
        self.query_list(
            &format!("SELECT {APPLICATION_COLUMNS} FROM applications ORDER BY id"),
            [],
            application_from_row,
        )
    }

    fn get_application(&self, id: i64) -> Result<Option<Application>> {
        self.query_one(
            &format!("SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = ?1"),
            params![id],
            application_from_row,
        )
    }

    fn create_application(&self, application: &Application) -> Result<Application> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO applications (name, email, role, portfolio, message, cv, status, date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                application.name,
                application.email,
                application.role,
                application.portfolio,
                application.message,
                application.cv,
                application.status,
                format_date(&application.date),
            ],
        )?;

        Ok(Application {
            id: conn.last_insert_rowid(),
            ..application.clone()
        })
    }

    fn update_application(&self, application: &Application) -> Result<()> {
        self.execute_update(
            "UPDATE applications SET name = ?1, email = ?2, role = ?3, portfolio = ?4,
                 message = ?5, cv = ?6, status = ?7
             WHERE id = ?8",
            params![
                application.name,
                application.email,
                application.role,
                application.portfolio,
                application.message,
                application.cv,
                application.status,
                application.id,
            ],
        )
    }

    // Changelog operations

    fn list_changelogs(&self) -> Result<Vec<Changelog>> {
        self.query_list(
            &format!("SELECT {CHANGELOG_COLUMNS} FROM changelogs ORDER BY id"),
            [],
            changelog_from_row,
        )
    }

    fn get_changelog(&self, id: i64) -> Result<Option<Changelog>> {
        self.query_one(
            &format!("SELECT {CHANGELOG_COLUMNS} FROM changelogs WHERE id = ?1"),
            params![id],
            changelog_from_row,
        )
    }

    fn create_changelog(&self, changelog: &Changelog) -> Result<Changelog> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO changelogs (device, rom_type, version, date, changelog, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                changelog.device,
                changelog.rom_type,
                changelog.version,
                format_date(&changelog.date),
                changelog.changelog,
                changelog.status,
            ],
        )?;

        Ok(Changelog {
            id: conn.last_insert_rowid(),
            ..changelog.clone()
        })
    }

    fn update_changelog(&self, changelog: &Changelog) -> Result<()> {
        self.execute_update(
            "UPDATE changelogs SET device = ?1, rom_type = ?2, version = ?3, date = ?4,
                 changelog = ?5, status = ?6
             WHERE id = ?7",
            params![
                changelog.device,
                changelog.rom_type,
                changelog.version,
                format_date(&changelog.date),
                changelog.changelog,
                changelog.status,
                changelog.id,
            ],
        )
    }

    fn delete_changelog(&self, id: i64) -> Result<bool> {
        self.execute_delete("DELETE FROM changelogs WHERE id = ?1", id)
    }

    // Site settings

    fn get_settings(&self) -> Result<Option<SiteSettings>> {
        self.query_one(
            &format!("SELECT {SETTINGS_COLUMNS} FROM settings WHERE id = ?1"),
            params![SiteSettings::ID],
            settings_from_row,
        )
    }

    fn upsert_settings(&self, settings: &SiteSettings) -> Result<()> {
        self.conn().execute(
            &format!(
                "INSERT INTO settings (id, {SETTINGS_COLUMNS})
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                     site_name = excluded.site_name,
                     site_description = excluded.site_description,
                     contact_email = excluded.contact_email,
                     discord_link = excluded.discord_link,
                     telegram_link = excluded.telegram_link,
                     download_server = excluded.download_server,
                     enable_downloads = excluded.enable_downloads,
                     enable_team_applications = excluded.enable_team_applications"
            ),
            params![
                SiteSettings::ID,
                settings.site_name,
                settings.site_description,
                settings.contact_email,
                settings.discord_link,
                settings.telegram_link,
                settings.download_server,
                settings.enable_downloads,
                settings.enable_team_applications,
            ],
        )?;
        Ok(())
    }

    // User operations

    fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            user_from_row,
        )
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            user_from_row,
        )
    }

    fn first_user(&self) -> Result<Option<User>> {
        self.query_one(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT 1"),
            [],
            user_from_row,
        )
    }

    fn create_user(&self, user: &User) -> Result<User> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (email, password_hash, role) VALUES (?1, ?2, ?3)",
            params![user.email, user.password_hash, user.role],
        )
        .map_err(|e| constraint_as_conflict(e, "Email already in use"))?;

        Ok(User {
            id: conn.last_insert_rowid(),
            ..user.clone()
        })
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let rows = self
            .conn()
            .execute(
                "UPDATE users SET email = ?1, password_hash = ?2, role = ?3 WHERE id = ?4",
                params![user.email, user.password_hash, user.role, user.id],
            )
            .map_err(|e| constraint_as_conflict(e, "Email already in use"))?;

        if rows == 0 {
            return Err(Error::NotFound);
        }
        Ok(())
    }

    // Session operations

    fn create_session(&self, session: &Session) -> Result<()> {
        let result = self.conn().execute(
            &format!("INSERT INTO sessions ({SESSION_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
            params![
                session.id,
                session.user_id,
                session.token_hash,
                session.token_lookup,
                format_datetime(&session.created_at),
                format_datetime(&session.expires_at),
            ],
        );

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(Error::TokenLookupCollision)
            }
            Err(e) => Err(Error::from(e)),
        }
    }

    fn get_session_by_lookup(&self, lookup: &str) -> Result<Option<Session>> {
        self.query_one(
            &format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE token_lookup = ?1"),
            params![lookup],
            session_from_row,
        )
    }

    fn delete_session(&self, id: &str) -> Result<bool> {
        let rows = self
            .conn()
            .execute("DELETE FROM sessions WHERE id = ?1", params![id])?;
        Ok(rows > 0)
    }

    fn delete_user_sessions(&self, user_id: i64) -> Result<()> {
        self.conn()
            .execute("DELETE FROM sessions WHERE user_id = ?1", params![user_id])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use tempfile::TempDir;

    fn open_store(temp: &TempDir) -> SqliteStore {
        let store = SqliteStore::new(temp.path().join("test.db")).unwrap();
        store.initialize().unwrap();
        store
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn device(codename: &str) -> Device {
        Device {
            id: 0,
            name: format!("Device {codename}"),
            codename: codename.to_string(),
            status: Availability::Active,
            last_update: date("2024-01-01"),
            roms: Vec::new(),
        }
    }

    fn rom(codename: &str, version: &str) -> Rom {
        Rom {
            id: 0,
            device_codename: codename.to_string(),
            rom_type: RomType::SleepOs,
            version: version.to_string(),
            size: "1.2 GB".to_string(),
            maintainer: "maintainer".to_string(),
            download_url: "https://dl.example.com/rom.zip".to_string(),
            changelog: "# Changes".to_string(),
            notes: String::new(),
            status: Availability::Active,
            upload_date: date("2024-02-01"),
            downloads: 0,
        }
    }

    #[test]
    fn test_initialize_creates_tables() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let conn = store.conn();
        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        for table in [
            "devices",
            "roms",
            "applications",
            "changelogs",
            "settings",
            "users",
            "sessions",
        ] {
            assert!(tables.contains(&table.to_string()), "missing {table}");
        }
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);
        store.initialize().unwrap();
    }

    #[test]
    fn test_device_crud() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let created = store.create_device(&device("panther")).unwrap();
        assert!(created.id > 0);
        assert!(created.roms.is_empty());

        let fetched = store.get_device(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(
            store.get_device_by_codename("panther").unwrap().unwrap().id,
            created.id
        );

        let mut updated = fetched.clone();
        updated.name = "Pixel 7".to_string();
        updated.status = Availability::Inactive;
        store.update_device(&updated).unwrap();
        let fetched = store.get_device(created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Pixel 7");
        assert_eq!(fetched.status, Availability::Inactive);

        assert!(store.delete_device(created.id).unwrap());
        assert!(!store.delete_device(created.id).unwrap());
        assert!(store.get_device(created.id).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_codename_is_conflict() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        store.create_device(&device("panther")).unwrap();
        let result = store.create_device(&device("panther"));
        assert!(matches!(result, Err(Error::Conflict(_))));
    }

    #[test]
    fn test_update_missing_device_is_not_found() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let mut ghost = device("ghost");
        ghost.id = 42;
        assert!(matches!(store.update_device(&ghost), Err(Error::NotFound)));
        assert!(matches!(
            store.touch_device("ghost", date("2024-05-05")),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_touch_device_sets_last_update() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let created = store.create_device(&device("lynx")).unwrap();
        store.touch_device("lynx", date("2024-06-30")).unwrap();
        let fetched = store.get_device(created.id).unwrap().unwrap();
        assert_eq!(fetched.last_update, date("2024-06-30"));
    }

    #[test]
    fn test_roms_are_listed_by_codename_in_id_order() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let first = store.create_rom(&rom("panther", "1.0")).unwrap();
        store.create_rom(&rom("lynx", "1.0")).unwrap();
        let second = store.create_rom(&rom("panther", "1.1")).unwrap();

        let panther = store.list_device_roms("panther").unwrap();
        assert_eq!(
            panther.iter().map(|r| r.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );
        assert_eq!(store.list_roms().unwrap().len(), 3);
    }

    #[test]
    fn test_increment_downloads() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let created = store.create_rom(&rom("panther", "1.0")).unwrap();
        assert!(store.increment_rom_downloads(created.id).unwrap());
        assert!(store.increment_rom_downloads(created.id).unwrap());
        assert!(!store.increment_rom_downloads(created.id + 100).unwrap());

        let fetched = store.get_rom(created.id).unwrap().unwrap();
        assert_eq!(fetched.downloads, 2);
    }

    #[test]
    fn test_deleting_device_keeps_its_roms() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let created = store.create_device(&device("panther")).unwrap();
        store.create_rom(&rom("panther", "1.0")).unwrap();
        store.delete_device(created.id).unwrap();

        assert_eq!(store.list_device_roms("panther").unwrap().len(), 1);
    }

    #[test]
    fn test_application_update() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let created = store
            .create_application(&Application {
                id: 0,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: "Maintainer".to_string(),
                portfolio: "https://github.com/ada".to_string(),
                message: "Hello".to_string(),
                cv: None,
                status: ApplicationStatus::Pending,
                date: date("2024-03-03"),
            })
            .unwrap();

        let mut accepted = created.clone();
        accepted.status = ApplicationStatus::Accepted;
        store.update_application(&accepted).unwrap();
        let fetched = store.get_application(created.id).unwrap().unwrap();
        assert_eq!(fetched.status, ApplicationStatus::Accepted);
        assert_eq!(fetched.date, date("2024-03-03"));

        let mut missing = accepted;
        missing.id = 999;
        assert!(matches!(
            store.update_application(&missing),
            Err(Error::NotFound)
        ));
    }

    #[test]
    fn test_changelog_crud() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let created = store
            .create_changelog(&Changelog {
                id: 0,
                device: "Pixel 7".to_string(),
                rom_type: RomType::Aosp,
                version: "14".to_string(),
                date: date("2024-04-04"),
                changelog: "- fixes".to_string(),
                status: ChangelogStatus::Draft,
            })
            .unwrap();

        let mut published = created.clone();
        published.status = ChangelogStatus::Published;
        store.update_changelog(&published).unwrap();
        assert_eq!(
            store.get_changelog(created.id).unwrap().unwrap().status,
            ChangelogStatus::Published
        );

        assert!(store.delete_changelog(created.id).unwrap());
        assert!(store.list_changelogs().unwrap().is_empty());
    }

    #[test]
    fn test_settings_upsert_keeps_single_row() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        assert!(store.get_settings().unwrap().is_none());

        let mut settings = SiteSettings::default();
        store.upsert_settings(&settings).unwrap();
        settings.site_name = "SleepOS Nightly".to_string();
        settings.enable_downloads = false;
        store.upsert_settings(&settings).unwrap();

        let count: i64 = store
            .conn()
            .query_row("SELECT COUNT(*) FROM settings", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(store.get_settings().unwrap().unwrap(), settings);
    }

    #[test]
    fn test_user_email_is_unique() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let user = User {
            id: 0,
            email: "admin@example.com".to_string(),
            password_hash: "$argon2id$placeholder".to_string(),
            role: Role::Admin,
        };
        let created = store.create_user(&user).unwrap();
        assert_eq!(store.first_user().unwrap().unwrap().id, created.id);
        assert!(matches!(store.create_user(&user), Err(Error::Conflict(_))));
    }

    #[test]
    fn test_session_lookup_collision() {
        let temp = TempDir::new().unwrap();
        let store = open_store(&temp);

        let user = store
            .create_user(&User {
                id: 0,
                email: "admin@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: Role::Admin,
            })
            .unwrap();

        let now = Utc::now();
        let session = Session {
            id: "session-1".to_string(),
            user_id: user.id,
            token_hash: "hash".to_string(),
            token_lookup: "abcd1234".to_string(),
            created_at: now,
            expires_at: now + Duration::hours(1),
        };
        store.create_session(&session).unwrap();

        let fetched = store.get_session_by_lookup("abcd1234").unwrap().unwrap();
        assert_eq!(fetched.user_id, user.id);

        let duplicate = Session {
            id: "session-2".to_string(),
            ..session
        };
        assert!(matches!(
            store.create_session(&duplicate),
            Err(Error::TokenLookupCollision)
        ));

        store.delete_user_sessions(user.id).unwrap();
        assert!(store.get_session_by_lookup("abcd1234").unwrap().is_none());
    }

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        store.initialize().unwrap();
        assert!(store.list_devices().unwrap().is_empty());
    }
}
