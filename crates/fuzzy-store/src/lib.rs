//! Read-only SQLite collaborator for the fuzzy client.
//!
//! Two narrow accessors over a local database: per-group config values and
//! per-group word lists. The event loop only reads; whatever maintains the
//! rows is outside this process.

mod config;
mod database;
mod error;
mod schema;
mod wordlists;

pub use config::ConfigStore;
pub use database::Database;
pub use error::StoreError;
pub use wordlists::{GroupScope, WordListStore};
