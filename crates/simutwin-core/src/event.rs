//! Line events.
//!
//! The production line records what happened to each product during a
//! tick. Events are collected in tick order and returned with the tick's
//! snapshot; the session uses them to maintain its product registry and the
//! server uses them for logging.

use crate::id::{MachineId, ProductId};

/// Something that happened to a product during one tick. All events carry
/// the tick at which they occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// The first machine accepted a new product.
    Admitted {
        product: ProductId,
        machine: MachineId,
        tick: u64,
    },
    /// A product moved from one machine to the next.
    HandedOff {
        product: ProductId,
        from: MachineId,
        to: MachineId,
        tick: u64,
    },
    /// A product left the last machine.
    Finished { product: ProductId, tick: u64 },
    /// A finished product was discarded because the next machine was busy.
    Dropped {
        product: ProductId,
        at: MachineId,
        tick: u64,
    },
    /// A finished product was parked because the next machine was busy.
    /// Emitted once, when the machine first becomes blocked.
    Blocked {
        product: ProductId,
        at: MachineId,
        tick: u64,
    },
}

impl LineEvent {
    pub fn product(&self) -> ProductId {
        match self {
            LineEvent::Admitted { product, .. }
            | LineEvent::HandedOff { product, .. }
            | LineEvent::Finished { product, .. }
            | LineEvent::Dropped { product, .. }
            | LineEvent::Blocked { product, .. } => *product,
        }
    }

    pub fn tick(&self) -> u64 {
        match self {
            LineEvent::Admitted { tick, .. }
            | LineEvent::HandedOff { tick, .. }
            | LineEvent::Finished { tick, .. }
            | LineEvent::Dropped { tick, .. }
            | LineEvent::Blocked { tick, .. } => *tick,
        }
    }
}
