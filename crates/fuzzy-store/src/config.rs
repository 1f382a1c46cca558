use tracing::warn;

use crate::database::Database;
use crate::error::StoreError;

/// Per-group configuration values, `(key, group) -> value`.
///
/// Absence folds into the caller-supplied default, and so do query failures:
/// a broken store must not take the event loop down with it. Failures are
/// logged at warn so they stay visible.
pub struct ConfigStore {
    db: Database,
}

impl ConfigStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stored value for `(key, gid)`, or `default` when no row exists or the
    /// lookup fails.
    pub fn get(&self, key: &str, gid: i64, default: &str) -> String {
        match self.lookup(key, gid) {
            Ok(Some(value)) => value,
            Ok(None) => default.to_string(),
            Err(e) => {
                warn!(key, gid, "config lookup failed: {e}");
                default.to_string()
            }
        }
    }

    /// Like [`get`], with the stored text parsed as an integer. A value that
    /// does not parse counts as a failed conversion and yields `default`.
    ///
    /// [`get`]: ConfigStore::get
    pub fn get_i64(&self, key: &str, gid: i64, default: i64) -> i64 {
        match self.lookup(key, gid) {
            Ok(Some(value)) => value.trim().parse::<i64>().unwrap_or_else(|_| {
                warn!(key, gid, %value, "config value is not an integer");
                default
            }),
            Ok(None) => default,
            Err(e) => {
                warn!(key, gid, "config lookup failed: {e}");
                default
            }
        }
    }

    fn lookup(&self, key: &str, gid: i64) -> Result<Option<String>, StoreError> {
        self.db.with_conn(|conn| {
            match conn.query_row(
                "SELECT value FROM config WHERE key = ?1 AND id = ?2",
                rusqlite::params![key, gid],
                |row| row.get::<_, String>(0),
            ) {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_rows(rows: &[(i64, &str, &str)]) -> ConfigStore {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            for (gid, key, value) in rows {
                conn.execute(
                    "INSERT INTO config (id, key, value) VALUES (?1, ?2, ?3)",
                    rusqlite::params![gid, key, value],
                )?;
            }
            Ok(())
        })
        .unwrap();
        ConfigStore::new(db)
    }

    #[test]
    fn missing_row_returns_default() {
        let store = store_with_rows(&[]);
        assert_eq!(store.get("greeting", 0, "hello"), "hello");
        assert_eq!(store.get_i64("retries", 0, 3), 3);
    }

    #[test]
    fn stored_value_wins_over_default() {
        let store = store_with_rows(&[(0, "greeting", "hola")]);
        assert_eq!(store.get("greeting", 0, "hello"), "hola");
    }

    #[test]
    fn lookups_are_scoped_by_group() {
        let store = store_with_rows(&[(1, "greeting", "hola"), (2, "greeting", "ciao")]);
        assert_eq!(store.get("greeting", 1, "hello"), "hola");
        assert_eq!(store.get("greeting", 2, "hello"), "ciao");
        assert_eq!(store.get("greeting", 3, "hello"), "hello");
    }

    #[test]
    fn repeated_reads_are_idempotent() {
        let store = store_with_rows(&[(0, "greeting", "hola")]);
        for _ in 0..3 {
            assert_eq!(store.get("greeting", 0, "hello"), "hola");
            assert_eq!(store.get("absent", 0, "d"), "d");
        }
    }

    #[test]
    fn integer_values_parse_and_garbage_falls_back() {
        let store = store_with_rows(&[(0, "retries", "5"), (0, "limit", "many")]);
        assert_eq!(store.get_i64("retries", 0, 3), 5);
        assert_eq!(store.get_i64("limit", 0, 10), 10);
    }
}
