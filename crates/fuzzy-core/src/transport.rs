use async_trait::async_trait;

use crate::{domain::ChatId, events::InboundEvent, Result};

/// Factory for live sessions.
///
/// The supervisor calls `connect` once per loop iteration; adapters own the
/// credentials and any proxy configuration.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open a fresh authenticated session.
    ///
    /// Credential or network failures surface as [`Error::Connection`] and are
    /// retried by the supervisor, never propagated out of the loop.
    ///
    /// [`Error::Connection`]: crate::Error::Connection
    async fn connect(&self) -> Result<Box<dyn Session>>;
}

/// One live authenticated connection to the messaging platform.
///
/// Telegram is the first implementation; the shape is kept narrow so other
/// event-based platforms can fit behind it.
#[async_trait]
pub trait Session: Send + Sync {
    /// Re-deliver events queued while the process was offline, through the
    /// normal handler path. At-least-once: duplicates are possible and
    /// handlers must tolerate them.
    async fn catch_up(&self) -> Result<()>;

    /// Wait for the next inbound event.
    ///
    /// `None` means the session ended (peer disconnect, network failure, or
    /// local shutdown); events are yielded in transport order.
    async fn next_event(&mut self) -> Option<InboundEvent>;

    /// Mark a chat as read / clear its notification state. Best-effort: the
    /// caller logs failures and moves on.
    async fn acknowledge(&self, chat_id: ChatId) -> Result<()>;

    /// Send a text message to a chat.
    async fn send_message(&self, target: ChatId, text: &str) -> Result<()>;

    /// Release connection resources. Idempotent; called on every exit path of
    /// a supervisor iteration.
    async fn close(&self);
}
