//! Read-only views of simulation state.
//!
//! [`Snapshot`] is the per-tick update sent to the client and is the only
//! type here with a fixed wire shape (camelCase JSON). [`MachineSnapshot`]
//! is a richer diagnostic view for logging and tests. All types are owned
//! copies with no references into the line.

use serde::{Deserialize, Serialize};

use crate::id::{MachineId, ProductId};
use crate::machine::MachineState;

// ---------------------------------------------------------------------------
// Update snapshot
// ---------------------------------------------------------------------------

/// Position of one in-flight product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub id: ProductId,
    pub x: f64,
    pub y: f64,
}

/// Bottleneck flag for one machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineStatus {
    pub id: MachineId,
    pub is_bottleneck: bool,
}

/// The state broadcast once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// In-flight products, oldest first.
    pub products: Vec<ProductSnapshot>,
    pub total_products_finished: u64,
    /// One entry per machine, in line order.
    pub machines: Vec<MachineStatus>,
}

// ---------------------------------------------------------------------------
// Machine snapshot
// ---------------------------------------------------------------------------

/// Coarse machine state without the held product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MachineStateKind {
    Idle,
    Busy,
    Blocked,
}

impl From<&MachineState> for MachineStateKind {
    fn from(state: &MachineState) -> Self {
        match state {
            MachineState::Idle => MachineStateKind::Idle,
            MachineState::Busy { .. } => MachineStateKind::Busy,
            MachineState::Blocked { .. } => MachineStateKind::Blocked,
        }
    }
}

/// An aggregated view of a single machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineSnapshot {
    pub id: MachineId,
    pub name: String,
    pub description: String,
    pub processing_time: u32,
    pub state: MachineStateKind,
    pub current_product: Option<ProductId>,
    /// Ticks left on the current product. 0 unless busy.
    pub time_remaining: u32,
    pub products_completed: u64,
    pub is_bottleneck: bool,
}
