use std::collections::BTreeSet;

use tracing::warn;

use crate::database::Database;
use crate::error::StoreError;

/// Which groups a word-list query covers.
///
/// `All` is an explicit sentinel, distinct from any concrete group id: it
/// asks for the union across every group, not for an "ungrouped" bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupScope {
    Group(i64),
    All,
}

/// Per-group word lists, `(type, group) -> set of words`.
///
/// Results are deduplicated and lexicographically sorted, so the order is
/// deterministic for unchanged data. Query failures are logged and fold into
/// an empty list.
pub struct WordListStore {
    db: Database,
}

impl WordListStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn words(&self, kind: &str, scope: GroupScope) -> Vec<String> {
        match self.query(kind, scope) {
            Ok(words) => words,
            Err(e) => {
                warn!(kind, ?scope, "wordlist query failed: {e}");
                Vec::new()
            }
        }
    }

    fn query(&self, kind: &str, scope: GroupScope) -> Result<Vec<String>, StoreError> {
        self.db.with_conn(|conn| {
            // BTreeSet gives dedup + ascending order in one pass.
            let mut words = BTreeSet::new();

            match scope {
                GroupScope::Group(gid) => {
                    let mut stmt = conn
                        .prepare("SELECT word FROM wordlists WHERE gid = ?1 AND type = ?2")?;
                    let rows = stmt.query_map(rusqlite::params![gid, kind], |row| {
                        row.get::<_, String>(0)
                    })?;
                    for word in rows {
                        words.insert(word?);
                    }
                }
                GroupScope::All => {
                    let mut stmt = conn.prepare("SELECT word FROM wordlists WHERE type = ?1")?;
                    let rows =
                        stmt.query_map(rusqlite::params![kind], |row| row.get::<_, String>(0))?;
                    for word in rows {
                        words.insert(word?);
                    }
                }
            }

            Ok(words.into_iter().collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_rows(rows: &[(i64, &str, &str)]) -> WordListStore {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            for (gid, kind, word) in rows {
                conn.execute(
                    "INSERT INTO wordlists (gid, type, word) VALUES (?1, ?2, ?3)",
                    rusqlite::params![gid, kind, word],
                )?;
            }
            Ok(())
        })
        .unwrap();
        WordListStore::new(db)
    }

    #[test]
    fn words_are_deduplicated_and_sorted() {
        let store = store_with_rows(&[
            (0, "trigger", "zebra"),
            (0, "trigger", "apple"),
            (0, "trigger", "apple"),
            (0, "trigger", "mango"),
        ]);
        assert_eq!(
            store.words("trigger", GroupScope::Group(0)),
            vec!["apple", "mango", "zebra"]
        );
    }

    #[test]
    fn group_scope_isolates_groups() {
        let store = store_with_rows(&[(1, "trigger", "one"), (2, "trigger", "two")]);
        assert_eq!(store.words("trigger", GroupScope::Group(1)), vec!["one"]);
        assert_eq!(store.words("trigger", GroupScope::Group(2)), vec!["two"]);
        assert!(store.words("trigger", GroupScope::Group(3)).is_empty());
    }

    #[test]
    fn all_scope_unions_across_groups() {
        let store = store_with_rows(&[
            (1, "trigger", "shared"),
            (2, "trigger", "shared"),
            (2, "trigger", "extra"),
        ]);
        assert_eq!(
            store.words("trigger", GroupScope::All),
            vec!["extra", "shared"]
        );
    }

    #[test]
    fn type_filters_apply_in_both_scopes() {
        let store = store_with_rows(&[(0, "trigger", "a"), (0, "ignore", "b")]);
        assert_eq!(store.words("trigger", GroupScope::Group(0)), vec!["a"]);
        assert_eq!(store.words("ignore", GroupScope::All), vec!["b"]);
        assert!(store.words("missing", GroupScope::All).is_empty());
    }

    #[test]
    fn unknown_type_yields_empty_not_error() {
        let store = store_with_rows(&[]);
        assert!(store.words("trigger", GroupScope::Group(0)).is_empty());
    }
}
