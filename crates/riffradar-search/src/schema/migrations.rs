/// A schema migration.
#[derive(Debug)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    pub sql: &'static str,
}

const MIGRATION_001: &str = r#"
-- Named vector collections. AUTOINCREMENT keeps ids from being reused after
-- a collection is deleted, so stale handles never see new rows.
CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

-- One row per stored vector. `seq` preserves insertion order for ties.
CREATE TABLE IF NOT EXISTS embeddings (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
    id TEXT NOT NULL,
    dimension INTEGER NOT NULL,
    vector BLOB NOT NULL,
    metadata TEXT NOT NULL,
    UNIQUE (collection_id, id)
);

CREATE INDEX IF NOT EXISTS idx_embeddings_collection ON embeddings(collection_id, seq);
"#;

const MIGRATION_002: &str = r#"
-- Key/value cache with absolute expiry (unix epoch milliseconds).
CREATE TABLE IF NOT EXISTS cache_entries (
    key TEXT PRIMARY KEY,
    value BLOB NOT NULL,
    expires_at INTEGER NOT NULL
);
"#;

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        name: "vector_collections",
        sql: MIGRATION_001,
    },
    Migration {
        version: 2,
        name: "cache_entries",
        sql: MIGRATION_002,
    },
];
