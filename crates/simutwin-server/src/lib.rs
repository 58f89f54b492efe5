//! SimuTwin server: streams production-line simulations to a layout editor
//! over WebSocket.
//!
//! Each connection gets its own session slot. A `start-simulation` event
//! builds a [`simutwin_core::Simulation`] from the editor's layout and
//! starts a clock; every tick the server pushes a `simulation-update`.
//! `reset-simulation` stops the clock and is acknowledged with
//! `simulation-reset`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use simutwin_server::{ServerConfig, serve};
//!
//! serve(ServerConfig::default()).await?;
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod protocol;
pub mod server;
pub mod session;

pub use config::ServerConfig;
pub use connection::run_connection;
pub use error::ServerError;
pub use protocol::{ClientMessage, ServerMessage};
pub use server::{serve, serve_listener};
pub use session::SessionManager;
