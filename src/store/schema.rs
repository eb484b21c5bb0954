pub const SCHEMA: &str = r#"
-- Devices supported by the ROM project
CREATE TABLE IF NOT EXISTS devices (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    codename TEXT NOT NULL UNIQUE,  -- join key for roms, never changed
    status TEXT NOT NULL DEFAULT 'Active',
    last_update TEXT NOT NULL
);

-- ROM builds; device_codename is matched by the application, not a declared FK
CREATE TABLE IF NOT EXISTS roms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device_codename TEXT NOT NULL,
    rom_type TEXT NOT NULL,
    version TEXT NOT NULL,
    size TEXT NOT NULL,
    maintainer TEXT NOT NULL,
    download_url TEXT NOT NULL,
    changelog TEXT NOT NULL,
    notes TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL DEFAULT 'Active',
    upload_date TEXT NOT NULL,
    downloads INTEGER NOT NULL DEFAULT 0
);

-- Public team applications
CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    role TEXT NOT NULL,
    portfolio TEXT NOT NULL,
    message TEXT NOT NULL,
    cv TEXT,
    status TEXT NOT NULL DEFAULT 'Pending',
    date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS changelogs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    device TEXT NOT NULL,          -- display name, denormalized
    rom_type TEXT NOT NULL,
    version TEXT NOT NULL,
    date TEXT NOT NULL,
    changelog TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Draft'
);

-- Singleton: the only row has id 1
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    site_name TEXT NOT NULL,
    site_description TEXT NOT NULL,
    contact_email TEXT NOT NULL,
    discord_link TEXT NOT NULL,
    telegram_link TEXT NOT NULL,
    download_server TEXT NOT NULL,
    enable_downloads INTEGER NOT NULL,
    enable_team_applications INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,   -- argon2id hash with embedded salt
    role TEXT NOT NULL DEFAULT 'user'
);

-- Login sessions; the bearer token itself is never stored
CREATE TABLE IF NOT EXISTS sessions (
    id TEXT PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    token_hash TEXT NOT NULL,
    token_lookup TEXT NOT NULL,
    created_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_roms_device ON roms(device_codename);
CREATE UNIQUE INDEX IF NOT EXISTS idx_sessions_lookup ON sessions(token_lookup);
CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
"#;
