use std::sync::Arc;

use fuzzy_core::{
    config::Config,
    events::HandlerRegistry,
    filter::CommandFilter,
    supervisor::{ReconnectPolicy, SessionSupervisor},
};
use fuzzy_store::{ConfigStore, Database, GroupScope, WordListStore};
use fuzzy_telegram::TelegramTransport;

#[tokio::main]
async fn main() -> Result<(), fuzzy_core::Error> {
    let cfg = Arc::new(Config::load()?);
    let _log_guard = fuzzy_core::logging::init("fuzzy", &cfg.log_dir)?;

    let db =
        Database::open(&cfg.database_path).map_err(|e| fuzzy_core::Error::Store(e.to_string()))?;
    let config_store = ConfigStore::new(db.clone());
    let wordlists = WordListStore::new(db);

    // A stored override wins over the env default.
    let quit_command = config_store.get("quitcommand", 0, &cfg.quit_command);
    tracing::debug!(
        trigger_words = wordlists.words("trigger", GroupScope::All).len(),
        "store ready"
    );

    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(CommandFilter::new(
        quit_command,
        cfg.authorized_users.clone(),
    )));

    let transport = Arc::new(TelegramTransport::new(cfg.clone()));
    let mut supervisor =
        SessionSupervisor::new(transport, registry).with_policy(ReconnectPolicy {
            initial_delay: cfg.reconnect_delay,
            max_delay: cfg.reconnect_max_delay,
        });
    if let Some(chat) = cfg.owner_chat {
        supervisor = supervisor.with_announcement(chat);
    }

    // Returns only after an authorized termination command; exit code 0.
    supervisor.run().await;
    Ok(())
}
