use async_trait::async_trait;

use crate::{
    domain::Sender,
    events::{Dispatch, EventHandler, InboundEvent},
    transport::Session,
};

/// Privileged termination command.
///
/// Matches when the event text equals the control string and the sender's
/// username is in the authorized set. On match it acknowledges the chat
/// (best-effort) and asks the supervisor to terminate. Safe under the
/// at-least-once re-delivery of catch-up: the check has no state and
/// non-matching events have no side effects.
pub struct CommandFilter {
    command: String,
    authorized: Vec<String>,
}

impl CommandFilter {
    pub fn new(command: impl Into<String>, authorized: Vec<String>) -> Self {
        Self {
            command: command.into(),
            authorized,
        }
    }

    fn is_authorized(&self, sender: &Sender) -> bool {
        let Some(username) = &sender.username else {
            return false;
        };
        self.authorized.iter().any(|u| u == username)
    }
}

#[async_trait]
impl EventHandler for CommandFilter {
    fn matches(&self, event: &InboundEvent) -> bool {
        event.text == self.command && self.is_authorized(&event.sender)
    }

    async fn handle(&self, event: &InboundEvent, session: &dyn Session) -> Dispatch {
        tracing::info!(
            user = event.sender.username.as_deref().unwrap_or("?"),
            "termination command received, shutting down"
        );

        // Clear the chat's notification state before exiting. Shutdown intent
        // must not be blocked by a failed acknowledgement.
        if let Err(e) = session.acknowledge(event.chat_id).await {
            tracing::warn!("read acknowledge failed: {e}");
        }

        Dispatch::Terminate
    }
}
