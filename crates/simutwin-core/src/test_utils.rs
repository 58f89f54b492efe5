//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so downstream
//! crates can pull them in through the `test-utils` feature.

use serde_json::{Value, json};

use crate::id::MachineId;
use crate::layout::{Footprint, Layout, MachineSpec};
use crate::session::Simulation;
use crate::sim::{HandoffPolicy, SimulationConfig};

// ===========================================================================
// Machine specs
// ===========================================================================

/// A machine spec with a 50x20 footprint at `top = 10`, so its centre is
/// `(left + 25, 20)`.
pub fn machine_spec(id: &str, left: f64, processing_time: u32) -> MachineSpec {
    MachineSpec {
        id: MachineId::from(id),
        name: id.to_string(),
        description: String::new(),
        processing_time,
        footprint: Footprint {
            left,
            top: 10.0,
            width: 50.0,
            height: 20.0,
        },
    }
}

/// A layout holding exactly `machines`, with no warnings.
pub fn layout_of(machines: Vec<MachineSpec>) -> Layout {
    Layout {
        machines,
        ..Layout::default()
    }
}

/// Build a simulation directly from specs.
pub fn simulation(machines: Vec<MachineSpec>, policy: HandoffPolicy) -> Simulation {
    let config = SimulationConfig::new().with_handoff_policy(policy);
    Simulation::new(layout_of(machines), &config).expect("test layout has machines")
}

/// A line of `times.len()` machines spaced 100 apart, left to right.
pub fn chain(times: &[u32], policy: HandoffPolicy) -> Simulation {
    let specs = times
        .iter()
        .enumerate()
        .map(|(i, &t)| machine_spec(&format!("M-{}", i + 1), i as f64 * 100.0, t))
        .collect();
    simulation(specs, policy)
}

// ===========================================================================
// Editor payloads
// ===========================================================================

/// A machine object as the layout editor sends it.
pub fn machine_entry(id: &str, left: f64, processing_time: u32) -> Value {
    json!({
        "id": id,
        "customType": "machine",
        "name": id,
        "description": "",
        "left": left,
        "top": 10.0,
        "width": 50.0,
        "height": 20.0,
        "processingTime": processing_time,
    })
}

/// A non-machine canvas object (conveyor, label, ...).
pub fn other_entry(id: &str, left: f64) -> Value {
    json!({
        "id": id,
        "customType": "other",
        "name": id,
        "description": "",
        "left": left,
        "top": 10.0,
        "width": 120.0,
        "height": 10.0,
    })
}
