//! Minimal line example: three machines, the middle one slow.
//!
//! Builds a line from an editor-style layout, runs 15 ticks, and prints the
//! update payload after each tick.
//!
//! Run with: `cargo run -p simutwin-core --example minimal_line`

use serde_json::json;
use simutwin_core::event::LineEvent;
use simutwin_core::{HandoffPolicy, Simulation, SimulationConfig};

fn main() {
    let layout = json!([
        {"id": "M-1", "customType": "machine", "name": "Cutter", "description": "",
         "left": 50, "top": 100, "width": 100, "height": 60, "processingTime": 2},
        {"id": "C-1", "customType": "other", "name": "Conveyor", "description": "",
         "left": 160, "top": 125, "width": 80, "height": 10},
        {"id": "M-2", "customType": "machine", "name": "Welder", "description": "",
         "left": 250, "top": 100, "width": 100, "height": 60, "processingTime": 4},
        {"id": "M-3", "customType": "machine", "name": "Packer", "description": "",
         "left": 450, "top": 100, "width": 100, "height": 60, "processingTime": 1},
    ]);

    for policy in [HandoffPolicy::Drop, HandoffPolicy::Block] {
        println!("=== hand-off policy: {policy:?} ===");
        let config = SimulationConfig::new().with_handoff_policy(policy);
        let mut sim = Simulation::from_json(&layout, &config).expect("layout has machines");

        for machine in sim.line().snapshot_machines() {
            println!(
                "  {:>4} {:<8} {} ticks{}",
                machine.id,
                machine.name,
                machine.processing_time,
                if machine.is_bottleneck { "  <- bottleneck" } else { "" }
            );
        }

        for _ in 0..15 {
            let report = sim.step();
            let payload = serde_json::to_string(&report.snapshot).expect("snapshot serializes");
            println!("tick {:>2}: {payload}", report.tick);
            for event in &report.events {
                if matches!(event, LineEvent::Dropped { .. } | LineEvent::Blocked { .. }) {
                    println!("         {event:?}");
                }
            }
        }

        println!(
            "admitted={} finished={} dropped={} in flight={}\n",
            sim.total_admitted(),
            sim.total_finished(),
            sim.total_dropped(),
            sim.in_flight()
        );
    }
}
