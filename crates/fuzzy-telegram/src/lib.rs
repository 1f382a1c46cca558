//! Telegram adapter (teloxide).
//!
//! Implements the `fuzzy-core` transport ports over the Telegram Bot API. A
//! session wraps a polling dispatcher whose single endpoint forwards text
//! messages into an ordered channel the supervisor drains.

use async_trait::async_trait;
use std::sync::Arc;

use teloxide::{
    dispatching::{Dispatcher, ShutdownToken},
    dptree,
    prelude::*,
    types::Message,
};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use fuzzy_core::{
    config::Config,
    domain::{ChatId, Sender, UserId},
    errors::Error,
    events::InboundEvent,
    transport::{Session, Transport},
    Result,
};

pub struct TelegramTransport {
    cfg: Arc<Config>,
}

impl TelegramTransport {
    pub fn new(cfg: Arc<Config>) -> Self {
        Self { cfg }
    }

    fn build_bot(&self) -> Result<Bot> {
        let Some(proxy_url) = &self.cfg.proxy_url else {
            return Ok(Bot::new(self.cfg.bot_token.clone()));
        };

        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| Error::Connection(format!("invalid proxy url: {e}")))?;
        let client = reqwest::Client::builder()
            .proxy(proxy)
            .build()
            .map_err(|e| Error::Connection(format!("proxy client: {e}")))?;

        Ok(Bot::with_client(self.cfg.bot_token.clone(), client))
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    async fn connect(&self) -> Result<Box<dyn Session>> {
        let bot = self.build_bot()?;

        // Validate credentials up front so a bad token surfaces as a
        // connection failure here, not somewhere inside the dispatcher.
        let me = bot
            .get_me()
            .await
            .map_err(|e| Error::Connection(format!("telegram auth failed: {e}")))?;
        tracing::info!(
            session = %self.cfg.session_name,
            bot = me.username(),
            "connected to telegram"
        );

        let (tx, rx) = mpsc::channel::<InboundEvent>(64);
        let handler = dptree::entry().branch(Update::filter_message().endpoint(forward_message));
        let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
            .dependencies(dptree::deps![tx])
            .build();
        let shutdown = dispatcher.shutdown_token();
        let pump = tokio::spawn(async move {
            dispatcher.dispatch().await;
        });

        Ok(Box::new(TelegramSession {
            bot,
            events: rx,
            shutdown,
            pump,
        }))
    }
}

async fn forward_message(msg: Message, tx: mpsc::Sender<InboundEvent>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(from) = msg.from() else {
        return Ok(());
    };

    let event = InboundEvent {
        chat_id: ChatId(msg.chat.id.0),
        sender: Sender {
            id: UserId(from.id.0 as i64),
            username: from.username.clone(),
        },
        text: text.to_string(),
    };

    // A dropped receiver means the session is being torn down; the event can
    // only be discarded at that point.
    let _ = tx.send(event).await;
    Ok(())
}

pub struct TelegramSession {
    bot: Bot,
    events: mpsc::Receiver<InboundEvent>,
    shutdown: ShutdownToken,
    pump: JoinHandle<()>,
}

#[async_trait]
impl Session for TelegramSession {
    async fn catch_up(&self) -> Result<()> {
        // Bot API long polling re-delivers updates queued server-side while
        // the process was offline on the first poll, through the normal
        // handler path. Nothing extra to request.
        tracing::debug!("catch-up delegated to long-polling replay");
        Ok(())
    }

    async fn next_event(&mut self) -> Option<InboundEvent> {
        self.events.recv().await
    }

    async fn acknowledge(&self, chat_id: ChatId) -> Result<()> {
        // The Bot API has no read-receipt call; a chat action is the closest
        // observable acknowledgement of having consumed the chat.
        self.bot
            .send_chat_action(
                TelegramTransport::tg_chat(chat_id),
                teloxide::types::ChatAction::Typing,
            )
            .await
            .map_err(|e| Error::Acknowledge(format!("telegram error: {e}")))?;
        Ok(())
    }

    async fn send_message(&self, target: ChatId, text: &str) -> Result<()> {
        self.bot
            .send_message(TelegramTransport::tg_chat(target), text.to_string())
            .await
            .map_err(|e| Error::External(format!("telegram send failed: {e}")))?;
        Ok(())
    }

    async fn close(&self) {
        if let Ok(done) = self.shutdown.shutdown() {
            done.await;
        }
        self.pump.abort();
    }
}

impl Drop for TelegramSession {
    fn drop(&mut self) {
        // Backstop for exit paths that never reached close().
        let _ = self.shutdown.shutdown();
        self.pump.abort();
    }
}
