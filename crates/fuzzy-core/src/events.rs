use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    domain::{ChatId, Sender},
    transport::Session,
};

/// A single inbound message as seen by the dispatch layer.
///
/// Ephemeral: consumed by handlers, never stored. Handlers that need to talk
/// back to the platform receive the owning session at dispatch time.
#[derive(Clone, Debug)]
pub struct InboundEvent {
    pub chat_id: ChatId,
    pub sender: Sender,
    pub text: String,
}

/// Verdict a handler returns to the dispatch loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Keep delivering events on the current session.
    Continue,
    /// Tear down the session and stop the supervisor for good.
    Terminate,
}

/// A predicate + handler pair evaluated against every inbound event.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Cheap predicate; `handle` runs only when this returns true.
    fn matches(&self, event: &InboundEvent) -> bool;

    async fn handle(&self, event: &InboundEvent, session: &dyn Session) -> Dispatch;
}

/// Handlers evaluated in registration order against each inbound event.
///
/// A `Terminate` verdict stops the sweep immediately; non-matching handlers
/// have no observable effect and do not block the ones after them.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub async fn dispatch(&self, event: &InboundEvent, session: &dyn Session) -> Dispatch {
        for handler in &self.handlers {
            if !handler.matches(event) {
                continue;
            }
            if handler.handle(event, session).await == Dispatch::Terminate {
                return Dispatch::Terminate;
            }
        }
        Dispatch::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use crate::Result;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn event(text: &str) -> InboundEvent {
        InboundEvent {
            chat_id: ChatId(10),
            sender: Sender {
                id: UserId(1),
                username: Some("alice".to_string()),
            },
            text: text.to_string(),
        }
    }

    struct NullSession;

    #[async_trait]
    impl Session for NullSession {
        async fn catch_up(&self) -> Result<()> {
            Ok(())
        }
        async fn next_event(&mut self) -> Option<InboundEvent> {
            None
        }
        async fn acknowledge(&self, _chat_id: ChatId) -> Result<()> {
            Ok(())
        }
        async fn send_message(&self, _target: ChatId, _text: &str) -> Result<()> {
            Ok(())
        }
        async fn close(&self) {}
    }

    struct CountingHandler {
        pattern: &'static str,
        verdict: Dispatch,
        hits: AtomicUsize,
    }

    impl CountingHandler {
        fn new(pattern: &'static str, verdict: Dispatch) -> Arc<Self> {
            Arc::new(Self {
                pattern,
                verdict,
                hits: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        fn matches(&self, event: &InboundEvent) -> bool {
            event.text == self.pattern
        }
        async fn handle(&self, _event: &InboundEvent, _session: &dyn Session) -> Dispatch {
            self.hits.fetch_add(1, Ordering::SeqCst);
            self.verdict
        }
    }

    #[tokio::test]
    async fn non_matching_handler_is_skipped() {
        let h = CountingHandler::new("/ping", Dispatch::Continue);
        let mut registry = HandlerRegistry::new();
        registry.register(h.clone());

        let verdict = registry.dispatch(&event("hello"), &NullSession).await;
        assert_eq!(verdict, Dispatch::Continue);
        assert_eq!(h.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handlers_run_in_registration_order_until_terminate() {
        let first = CountingHandler::new("/stop", Dispatch::Terminate);
        let second = CountingHandler::new("/stop", Dispatch::Continue);
        let mut registry = HandlerRegistry::new();
        registry.register(first.clone());
        registry.register(second.clone());

        let verdict = registry.dispatch(&event("/stop"), &NullSession).await;
        assert_eq!(verdict, Dispatch::Terminate);
        assert_eq!(first.hits.load(Ordering::SeqCst), 1);
        // Terminate short-circuits the sweep.
        assert_eq!(second.hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn continue_lets_later_handlers_run() {
        let first = CountingHandler::new("/stop", Dispatch::Continue);
        let second = CountingHandler::new("/stop", Dispatch::Continue);
        let mut registry = HandlerRegistry::new();
        registry.register(first.clone());
        registry.register(second.clone());

        let verdict = registry.dispatch(&event("/stop"), &NullSession).await;
        assert_eq!(verdict, Dispatch::Continue);
        assert_eq!(first.hits.load(Ordering::SeqCst), 1);
        assert_eq!(second.hits.load(Ordering::SeqCst), 1);
    }
}
