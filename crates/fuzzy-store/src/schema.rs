/// SQL DDL for the fuzzy database. WAL mode enabled at connection time.
///
/// `config.id` and `wordlists.gid` are group ids (0 = the default group).
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS config (
    id INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    PRIMARY KEY (id, key)
);

CREATE TABLE IF NOT EXISTS wordlists (
    gid INTEGER NOT NULL,
    type TEXT NOT NULL,
    word TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_wordlists_type_gid ON wordlists(type, gid);
"#;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
"#;
