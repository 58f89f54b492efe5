//! The per-session simulation record.
//!
//! A [`Simulation`] owns everything one client run needs: the production
//! line, the in-flight product registry and the counters. Nothing here is
//! shared between sessions; dropping the value discards the run.
//!
//! Each [`Simulation::step`] performs one tick:
//!
//! 1. **Advance** -- the line's reverse pass; finished products leave the
//!    registry and are counted, dropped products leave it uncounted.
//! 2. **Admit** -- one new product is offered to the first machine. An id is
//!    only consumed when the machine accepts it.
//! 3. **Place** -- every registered product is moved to the centre of the
//!    machine holding it.
//! 4. **Report** -- a [`Snapshot`] plus the tick's [`LineEvent`]s.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::SimError;
use crate::event::LineEvent;
use crate::id::ProductId;
use crate::layout::{Layout, LayoutWarning};
use crate::line::ProductionLine;
use crate::machine::Product;
use crate::query::{ProductSnapshot, Snapshot};
use crate::sim::SimulationConfig;

/// Displayed position of a registered product.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Placement {
    x: f64,
    y: f64,
}

/// Everything that came out of one tick.
#[derive(Debug, Clone)]
pub struct TickReport {
    /// The tick just completed, starting at 1.
    pub tick: u64,
    pub snapshot: Snapshot,
    pub events: Vec<LineEvent>,
}

/// One independent simulation run.
#[derive(Debug, Clone)]
pub struct Simulation {
    line: ProductionLine,
    /// In-flight products keyed by id, so iteration is oldest first.
    products: BTreeMap<ProductId, Placement>,
    /// Sequence number of the last admitted product.
    last_product: u64,
    total_finished: u64,
    total_dropped: u64,
    tick: u64,
    warnings: Vec<LayoutWarning>,
}

impl Simulation {
    /// Build a simulation from a parsed layout. Fails with
    /// [`SimError::EmptyLayout`] when the layout has no machines.
    pub fn new(layout: Layout, config: &SimulationConfig) -> Result<Self, SimError> {
        let Layout {
            machines, warnings, ..
        } = layout;
        let line = ProductionLine::new(machines, config.handoff_policy)?;
        Ok(Self {
            line,
            products: BTreeMap::new(),
            last_product: 0,
            total_finished: 0,
            total_dropped: 0,
            tick: 0,
            warnings,
        })
    }

    /// Parse a raw `start-simulation` payload and build a simulation from it.
    pub fn from_json(layout: &Value, config: &SimulationConfig) -> Result<Self, SimError> {
        let layout = Layout::from_json(layout, config.default_processing_time)?;
        Self::new(layout, config)
    }

    pub fn line(&self) -> &ProductionLine {
        &self.line
    }

    /// Number of ticks run so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn total_finished(&self) -> u64 {
        self.total_finished
    }

    /// Products lost to busy hand-offs under the drop policy.
    pub fn total_dropped(&self) -> u64 {
        self.total_dropped
    }

    /// Products admitted since the session started.
    pub fn total_admitted(&self) -> u64 {
        self.last_product
    }

    pub fn in_flight(&self) -> usize {
        self.products.len()
    }

    pub fn is_registered(&self, product: ProductId) -> bool {
        self.products.contains_key(&product)
    }

    /// Layout problems that were repaired or skipped when the session
    /// was built.
    pub fn warnings(&self) -> &[LayoutWarning] {
        &self.warnings
    }

    /// Run one tick.
    pub fn step(&mut self) -> TickReport {
        self.tick += 1;
        let tick = self.tick;
        let mut events = Vec::new();

        // 1. Advance.
        self.line.advance(tick, &mut events);
        for event in &events {
            match event {
                LineEvent::Finished { product, .. } => {
                    self.products.remove(product);
                    self.total_finished += 1;
                }
                LineEvent::Dropped { product, .. } => {
                    self.products.remove(product);
                    self.total_dropped += 1;
                }
                _ => {}
            }
        }

        // 2. Admit.
        let candidate = Product {
            id: ProductId(self.last_product + 1),
            admitted_at: tick,
        };
        let candidate_id = candidate.id;
        if self.line.admit(candidate, tick, &mut events).is_ok() {
            self.last_product = candidate_id.0;
            self.products.insert(candidate_id, Placement::default());
        }

        // 3. Place.
        for machine in self.line.machines() {
            if let Some(product) = machine.current_product()
                && let Some(placement) = self.products.get_mut(&product.id)
            {
                let (x, y) = machine.center();
                *placement = Placement { x, y };
            }
        }

        // 4. Report.
        TickReport {
            tick,
            snapshot: self.snapshot(),
            events,
        }
    }

    /// The current update payload.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            products: self
                .products
                .iter()
                .map(|(id, p)| ProductSnapshot {
                    id: *id,
                    x: p.x,
                    y: p.y,
                })
                .collect(),
            total_products_finished: self.total_finished,
            machines: self.line.machine_statuses(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::HandoffPolicy;
    use crate::test_utils::*;

    fn ids(snapshot: &Snapshot) -> Vec<String> {
        snapshot.products.iter().map(|p| p.id.to_string()).collect()
    }

    #[test]
    fn empty_layout_does_not_start() {
        let err = Simulation::new(layout_of(vec![]), &SimulationConfig::default()).unwrap_err();
        assert!(matches!(err, SimError::EmptyLayout));
    }

    #[test]
    fn first_tick_admits_and_places() {
        let mut sim = simulation(vec![machine_spec("M-1", 100.0, 3)], HandoffPolicy::Drop);
        let report = sim.step();
        assert_eq!(report.tick, 1);
        assert_eq!(ids(&report.snapshot), vec!["P-1"]);
        let p = &report.snapshot.products[0];
        // machine_spec uses a 50x20 footprint at top 10.
        assert_eq!((p.x, p.y), (125.0, 20.0));
        assert_eq!(report.snapshot.total_products_finished, 0);
    }

    #[test]
    fn failed_admissions_do_not_consume_ids() {
        let mut sim = simulation(vec![machine_spec("M-1", 0.0, 3)], HandoffPolicy::Drop);
        for _ in 0..3 {
            sim.step();
        }
        // P-1 admitted on tick 1, busy on ticks 2 and 3.
        assert_eq!(sim.total_admitted(), 1);
        let report = sim.step();
        // Tick 4: P-1 finishes, P-2 takes its place.
        assert_eq!(ids(&report.snapshot), vec!["P-2"]);
        assert_eq!(report.snapshot.total_products_finished, 1);
    }

    #[test]
    fn dropped_products_leave_registry_uncounted() {
        let mut sim = simulation(
            vec![machine_spec("fast", 0.0, 1), machine_spec("slow", 100.0, 3)],
            HandoffPolicy::Drop,
        );
        sim.step(); // P-1 admitted
        sim.step(); // P-1 -> slow, P-2 admitted
        let report = sim.step(); // P-2 dropped, P-3 admitted
        assert!(
            report
                .events
                .iter()
                .any(|e| matches!(e, LineEvent::Dropped { product: ProductId(2), .. }))
        );
        assert!(!sim.is_registered(ProductId(2)));
        assert_eq!(sim.total_dropped(), 1);
        assert_eq!(sim.total_finished(), 0);
        assert_eq!(ids(&report.snapshot), vec!["P-1", "P-3"]);
    }

    #[test]
    fn blocked_products_stay_registered() {
        let mut sim = simulation(
            vec![machine_spec("fast", 0.0, 1), machine_spec("slow", 100.0, 3)],
            HandoffPolicy::Block,
        );
        sim.step();
        sim.step();
        let report = sim.step();
        assert!(sim.is_registered(ProductId(2)));
        assert_eq!(sim.total_dropped(), 0);
        // fast is blocked, so nothing new was admitted.
        assert_eq!(ids(&report.snapshot), vec!["P-1", "P-2"]);
        // Blocked product is drawn on the machine holding it.
        assert_eq!(report.snapshot.products[1].x, 25.0);
    }

    #[test]
    fn bottleneck_flags_are_stable() {
        let mut sim = simulation(
            vec![machine_spec("M-1", 0.0, 2), machine_spec("M-2", 100.0, 5)],
            HandoffPolicy::Drop,
        );
        for _ in 0..20 {
            let report = sim.step();
            let flags: Vec<bool> = report
                .snapshot
                .machines
                .iter()
                .map(|m| m.is_bottleneck)
                .collect();
            assert_eq!(flags, vec![false, true]);
        }
    }

    #[test]
    fn from_json_applies_config_default() {
        let config = SimulationConfig::new().with_default_processing_time(9);
        let sim = Simulation::from_json(
            &serde_json::json!([{"id": "M-1", "customType": "machine"}]),
            &config,
        )
        .unwrap();
        assert_eq!(sim.line().machines()[0].processing_time(), 9);
        assert_eq!(sim.warnings().len(), 1);
    }
}
