use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::ChatId, errors::Error, Result};

/// Typed configuration for the fuzzy client.
///
/// Everything comes from the environment (with optional `.env` seeding);
/// credentials are never compiled in. Missing credentials abort startup with
/// a clear diagnostic instead of failing later inside the loop.
#[derive(Clone, Debug)]
pub struct Config {
    /// Logical session name, used for log context only.
    pub session_name: String,

    /// Bot API credential.
    pub bot_token: String,

    /// Optional outbound proxy for the Telegram connection.
    pub proxy_url: Option<String>,

    /// Usernames allowed to issue the termination command.
    pub authorized_users: Vec<String>,

    /// Control string that terminates the process. The store's `quitcommand`
    /// row overrides this at startup.
    pub quit_command: String,

    /// Chat that receives the best-effort "online" notice, if any.
    pub owner_chat: Option<ChatId>,

    pub database_path: PathBuf,
    pub log_dir: PathBuf,

    pub reconnect_delay: Duration,
    pub reconnect_max_delay: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let authorized_users = parse_csv(env_str("FUZZY_AUTHORIZED_USERS"));
        if authorized_users.is_empty() {
            return Err(Error::Config(
                "FUZZY_AUTHORIZED_USERS environment variable is required".to_string(),
            ));
        }

        let session_name = env_str("FUZZY_SESSION")
            .and_then(non_empty)
            .unwrap_or_else(|| "fuzzer".to_string());

        let proxy_url = env_str("TELEGRAM_PROXY_URL").and_then(non_empty);
        let quit_command = env_str("FUZZY_QUIT_COMMAND")
            .and_then(non_empty)
            .unwrap_or_else(|| "/quit".to_string());

        let owner_chat = env_str("FUZZY_OWNER_CHAT_ID")
            .and_then(|s| s.trim().parse::<i64>().ok())
            .map(ChatId);

        let database_path =
            PathBuf::from(env_str("FUZZY_DB_PATH").unwrap_or_else(|| "fuzzy.db".to_string()));
        let log_dir = PathBuf::from(env_str("FUZZY_LOG_DIR").unwrap_or_else(|| ".".to_string()));

        let reconnect_delay =
            Duration::from_millis(env_u64("FUZZY_RECONNECT_DELAY_MS").unwrap_or(1_000));
        let reconnect_max_delay =
            Duration::from_millis(env_u64("FUZZY_RECONNECT_MAX_MS").unwrap_or(30_000));

        Ok(Self {
            session_name,
            bot_token,
            proxy_url,
            authorized_users,
            quit_command,
            owner_chat,
            database_path,
            log_dir,
            reconnect_delay,
            reconnect_max_delay,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_csv(v: Option<String>) -> Vec<String> {
    v.unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_parsing_trims_and_drops_empties() {
        let users = parse_csv(Some(" iranzo, ,bob,,".to_string()));
        assert_eq!(users, vec!["iranzo".to_string(), "bob".to_string()]);
        assert!(parse_csv(None).is_empty());
    }

    #[test]
    fn non_empty_rejects_whitespace() {
        assert_eq!(non_empty("  ".to_string()), None);
        assert_eq!(non_empty("x".to_string()), Some("x".to_string()));
    }

    #[test]
    fn dotenv_does_not_override_existing_env() {
        let dir = std::env::temp_dir().join(format!("fuzzy-dotenv-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".env");
        fs::write(&path, "FUZZY_DOTENV_PROBE=from_file\n# comment\nBROKEN LINE\n").unwrap();

        env::set_var("FUZZY_DOTENV_PROBE", "from_env");
        load_dotenv_if_present(&path);
        assert_eq!(env::var("FUZZY_DOTENV_PROBE").unwrap(), "from_env");

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn dotenv_strips_quotes() {
        let dir = std::env::temp_dir().join(format!("fuzzy-dotenv-q-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(".env");
        fs::write(&path, "FUZZY_DOTENV_QUOTED=\"hello world\"\n").unwrap();

        env::remove_var("FUZZY_DOTENV_QUOTED");
        load_dotenv_if_present(&path);
        assert_eq!(env::var("FUZZY_DOTENV_QUOTED").unwrap(), "hello world");

        let _ = fs::remove_dir_all(&dir);
    }
}
