//! The per-connection event loop.
//!
//! One task owns the connection's [`SessionManager`] and selects over the
//! client's messages and the session clock, so lifecycle changes and ticks
//! are serialised. Once a reset has been handled no update for the old
//! session can follow it.

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::session::SessionManager;

/// Drive one client until its inbound stream ends or the outbound side is
/// closed.
pub async fn run_connection<S>(
    mut inbound: S,
    outbound: mpsc::UnboundedSender<ServerMessage>,
    config: &ServerConfig,
) where
    S: Stream<Item = ClientMessage> + Unpin,
{
    let mut sessions = SessionManager::new(config.simulation(), config.tick_interval());

    loop {
        tokio::select! {
            message = inbound.next() => {
                let Some(message) = message else {
                    sessions.close();
                    break;
                };
                match message {
                    ClientMessage::StartSimulation(layout) => {
                        if let Err(e) = sessions.open(&layout) {
                            warn!(error = %e, "simulation not started");
                        }
                    }
                    ClientMessage::ResetSimulation => {
                        if !sessions.reset_and_stop() {
                            debug!("reset with no running simulation");
                        }
                        if outbound.send(ServerMessage::SimulationReset).is_err() {
                            break;
                        }
                    }
                }
            }
            report = sessions.next_tick(), if sessions.is_running() => {
                if outbound.send(ServerMessage::SimulationUpdate(report.snapshot)).is_err() {
                    info!("outbound channel closed, stopping session");
                    sessions.close();
                    break;
                }
            }
        }
    }
}
