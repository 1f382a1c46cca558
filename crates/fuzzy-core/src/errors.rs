/// Core error type for the fuzzy client.
///
/// Adapter crates map their specific errors into this type so the supervisor
/// can tell recoverable connection trouble apart from real failures.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    /// Opening a session failed (bad credentials or network). Recovered by
    /// retrying the supervisor loop, never propagated to process exit.
    #[error("connection error: {0}")]
    Connection(String),

    /// The peer or the network dropped an established session. Recovered the
    /// same way as a connection failure.
    #[error("transport disconnected: {0}")]
    Disconnected(String),

    /// A read acknowledgement could not be delivered. Best-effort only;
    /// shutdown proceeds regardless.
    #[error("acknowledge failed: {0}")]
    Acknowledge(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
