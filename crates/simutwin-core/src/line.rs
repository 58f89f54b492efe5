//! The production line: an ordered chain of machines and the per-tick
//! advancement algorithm.
//!
//! # Ordering
//!
//! Machines are sorted once, at construction, by their horizontal canvas
//! position: what the operator sees left-to-right is the processing order.
//! Machines sharing a `left` keep their layout order. The order never
//! changes afterwards.
//!
//! # Advancement
//!
//! [`ProductionLine::advance`] visits machines from last to first. Machine
//! `i + 1` has already ticked by the time machine `i` hands it a finished
//! product, so the receiving machine only starts counting down on the next
//! tick and no product moves more than one machine per tick.

use crate::error::SimError;
use crate::event::LineEvent;
use crate::id::ProductId;
use crate::layout::MachineSpec;
use crate::machine::{Machine, MachineState, Product, TickOutcome};
use crate::query::{MachineSnapshot, MachineStatus};
use crate::sim::HandoffPolicy;

/// An ordered, fixed sequence of machines.
#[derive(Debug, Clone)]
pub struct ProductionLine {
    machines: Vec<Machine>,
    /// Largest processing time on the line, fixed at construction.
    max_processing_time: u32,
    policy: HandoffPolicy,
}

impl ProductionLine {
    /// Build a line from machine specs in any order.
    pub fn new(mut specs: Vec<MachineSpec>, policy: HandoffPolicy) -> Result<Self, SimError> {
        if specs.is_empty() {
            return Err(SimError::EmptyLayout);
        }
        // Stable: equal `left` keeps layout order.
        specs.sort_by(|a, b| a.footprint.left.total_cmp(&b.footprint.left));

        let max_processing_time = specs
            .iter()
            .map(|s| s.processing_time)
            .max()
            .unwrap_or_default();

        Ok(Self {
            machines: specs.into_iter().map(Machine::new).collect(),
            max_processing_time,
            policy,
        })
    }

    pub fn machines(&self) -> &[Machine] {
        &self.machines
    }

    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }

    pub fn policy(&self) -> HandoffPolicy {
        self.policy
    }

    pub fn max_processing_time(&self) -> u32 {
        self.max_processing_time
    }

    /// A machine is a bottleneck when its processing time equals the line
    /// maximum. Ties flag every qualifying machine.
    pub fn is_bottleneck(&self, machine: &Machine) -> bool {
        machine.processing_time() == self.max_processing_time
    }

    /// Bottleneck flags in line order.
    pub fn machine_statuses(&self) -> Vec<MachineStatus> {
        self.machines
            .iter()
            .map(|m| MachineStatus {
                id: m.id().clone(),
                is_bottleneck: self.is_bottleneck(m),
            })
            .collect()
    }

    /// Full per-machine view in line order.
    pub fn snapshot_machines(&self) -> Vec<MachineSnapshot> {
        self.machines
            .iter()
            .map(|m| MachineSnapshot {
                id: m.id().clone(),
                name: m.name().to_string(),
                description: m.description().to_string(),
                processing_time: m.processing_time(),
                state: m.state().into(),
                current_product: m.current_product().map(|p| p.id),
                time_remaining: m.time_remaining(),
                products_completed: m.products_completed(),
                is_bottleneck: self.is_bottleneck(m),
            })
            .collect()
    }

    /// Run the reverse pass for one tick. Finished products are handed to
    /// the next machine, or leave the line at the end.
    pub fn advance(&mut self, tick: u64, events: &mut Vec<LineEvent>) {
        let last = self.machines.len().saturating_sub(1);
        let policy = self.policy;

        for i in (0..self.machines.len()).rev() {
            let outcome = self.machines[i].tick();
            let retrying = matches!(outcome, TickOutcome::Retry(_));
            let Some(product) = outcome.into_product() else {
                continue;
            };

            if i == last {
                events.push(LineEvent::Finished {
                    product: product.id,
                    tick,
                });
                continue;
            }

            let (upstream, downstream) = self.machines.split_at_mut(i + 1);
            let from = &mut upstream[i];
            let to = &mut downstream[0];
            let product_id = product.id;

            let rejected = match to.start_work(product) {
                Ok(()) => {
                    events.push(LineEvent::HandedOff {
                        product: product_id,
                        from: from.id().clone(),
                        to: to.id().clone(),
                        tick,
                    });
                    continue;
                }
                Err(product) => product,
            };

            match policy {
                HandoffPolicy::Drop => events.push(LineEvent::Dropped {
                    product: product_id,
                    at: from.id().clone(),
                    tick,
                }),
                HandoffPolicy::Block => match from.hold(rejected) {
                    Ok(()) if retrying => {}
                    Ok(()) => events.push(LineEvent::Blocked {
                        product: product_id,
                        at: from.id().clone(),
                        tick,
                    }),
                    // `from` was emptied by its own tick, so this cannot
                    // happen; treat it like the drop policy.
                    Err(_) => events.push(LineEvent::Dropped {
                        product: product_id,
                        at: from.id().clone(),
                        tick,
                    }),
                },
            }
        }
    }

    /// Offer a new product to the first machine. Hands it back when that
    /// machine is not idle.
    pub fn admit(
        &mut self,
        product: Product,
        tick: u64,
        events: &mut Vec<LineEvent>,
    ) -> Result<(), Product> {
        let first = self.machines.first_mut().ok_or_else(|| product.clone())?;
        let product_id = product.id;
        first.start_work(product)?;
        events.push(LineEvent::Admitted {
            product: product_id,
            machine: first.id().clone(),
            tick,
        });
        Ok(())
    }

    /// The machine holding `product`, if any.
    pub fn holder_of(&self, product: ProductId) -> Option<&Machine> {
        self.machines
            .iter()
            .find(|m| m.current_product().is_some_and(|p| p.id == product))
    }

    /// Number of machines currently holding a product.
    pub fn occupied(&self) -> usize {
        self.machines
            .iter()
            .filter(|m| !matches!(m.state(), MachineState::Idle))
            .count()
    }
}
