//! Core domain + application logic for the fuzzy Telegram client.
//!
//! This crate is intentionally framework-agnostic. The Telegram transport and
//! the SQLite store live behind ports (traits) implemented in sibling crates.

pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod filter;
pub mod logging;
pub mod supervisor;
pub mod transport;
pub mod utils;

pub use errors::{Error, Result};
