use std::{sync::Arc, time::Duration};

use tokio::time::sleep;

use crate::{
    domain::ChatId,
    events::{Dispatch, HandlerRegistry},
    transport::{Session, Transport},
};

/// Connection lifecycle of the supervisor.
///
/// `Terminated` is the only state from which the process exits; it is reached
/// solely through an authorized termination command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupervisorState {
    Disconnected,
    Connecting,
    Connected,
    Terminated,
}

/// Bounded exponential backoff for reconnect attempts.
///
/// The cap bounds the delay, not the attempt count: the supervisor never
/// permanently gives up.
#[derive(Clone, Copy, Debug)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
        }
    }
}

/// Owns the connection lifecycle: opens sessions, dispatches inbound events
/// to the registered handlers, and reconnects until an authorized command
/// terminates the process.
///
/// At most one session is live at any time; iterations are strictly
/// sequential.
pub struct SessionSupervisor {
    transport: Arc<dyn Transport>,
    registry: HandlerRegistry,
    policy: ReconnectPolicy,
    announce_chat: Option<ChatId>,
    state: SupervisorState,
}

impl SessionSupervisor {
    pub fn new(transport: Arc<dyn Transport>, registry: HandlerRegistry) -> Self {
        Self {
            transport,
            registry,
            policy: ReconnectPolicy::default(),
            announce_chat: None,
            state: SupervisorState::Disconnected,
        }
    }

    pub fn with_policy(mut self, policy: ReconnectPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Send a short "online" notice to this chat after the first successful
    /// connect. Best-effort.
    pub fn with_announcement(mut self, chat: ChatId) -> Self {
        self.announce_chat = Some(chat);
        self
    }

    pub fn state(&self) -> SupervisorState {
        self.state
    }

    /// Run until an authorized termination command arrives.
    ///
    /// Each iteration opens a fresh session, replays missed events, then
    /// pumps live events until the session ends. Connection failures and
    /// disconnects restart the iteration; nothing else ends the loop.
    pub async fn run(&mut self) {
        tracing::info!("starting execution loop");
        let mut delay = self.policy.initial_delay;
        let mut announced = false;

        loop {
            self.state = SupervisorState::Connecting;
            let mut session = match self.transport.connect().await {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("connect failed: {e}, retrying in {delay:?}");
                    sleep(delay).await;
                    delay = (delay * 2).min(self.policy.max_delay);
                    continue;
                }
            };
            delay = self.policy.initial_delay;
            self.state = SupervisorState::Connected;
            tracing::info!("session established");

            if let Err(e) = session.catch_up().await {
                // Live traffic continues; anything missed is replayed on the
                // next reconnect.
                tracing::warn!("catch-up failed: {e}");
            }

            if !announced {
                announced = true;
                if let Some(chat) = self.announce_chat {
                    if let Err(e) = session.send_message(chat, "fuzzy online").await {
                        tracing::warn!("startup announcement failed: {e}");
                    }
                }
            }

            tracing::debug!("run until disconnect");
            let verdict = self.pump(session.as_mut()).await;
            session.close().await;

            match verdict {
                Dispatch::Terminate => {
                    self.state = SupervisorState::Terminated;
                    tracing::info!("terminated by command");
                    return;
                }
                Dispatch::Continue => {
                    self.state = SupervisorState::Disconnected;
                    tracing::info!("session dropped, reconnecting");
                }
            }
        }
    }

    async fn pump(&self, session: &mut dyn Session) -> Dispatch {
        while let Some(event) = session.next_event().await {
            tracing::debug!(chat = event.chat_id.0, "event received");
            if self.registry.dispatch(&event, &*session).await == Dispatch::Terminate {
                return Dispatch::Terminate;
            }
        }
        Dispatch::Continue
    }
}
