//! JSON envelopes exchanged with the layout editor.
//!
//! Every frame is a text frame holding `{"event": <name>, "data": <payload>}`.
//! Event names are kebab-case; `data` is omitted for events without a
//! payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use simutwin_core::query::Snapshot;

use crate::error::ServerError;

/// Client-to-server events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Start (or restart) a simulation from an editor layout.
    StartSimulation(Value),
    /// Stop the running simulation and acknowledge with a reset.
    ResetSimulation,
}

/// Server-to-client events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    SimulationUpdate(Snapshot),
    SimulationReset,
}

pub fn decode(text: &str) -> Result<ClientMessage, ServerError> {
    serde_json::from_str(text).map_err(|e| ServerError::Protocol {
        detail: e.to_string(),
    })
}

pub fn encode(message: &ServerMessage) -> Result<String, ServerError> {
    serde_json::to_string(message).map_err(|e| ServerError::Protocol {
        detail: e.to_string(),
    })
}
