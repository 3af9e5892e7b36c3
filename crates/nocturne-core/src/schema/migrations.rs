/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Downloaded contents, keyed by remote id
CREATE TABLE IF NOT EXISTS downloads (
    remote_id TEXT PRIMARY KEY,
    path TEXT NOT NULL,
    downloaded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_downloads_path ON downloads(path);
"#;

pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "download_ledger",
    sql: MIGRATION_001,
}];
