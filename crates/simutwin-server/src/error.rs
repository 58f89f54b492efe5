use std::path::PathBuf;

/// Errors raised by the SimuTwin server outside the simulation itself.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The configuration file could not be read or parsed.
    #[error("config error in {path}: {detail}")]
    Config { path: PathBuf, detail: String },

    /// An I/O error occurred on the listener or a socket.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The WebSocket handshake or a frame write failed.
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A message could not be encoded or decoded.
    #[error("protocol error: {detail}")]
    Protocol { detail: String },
}
