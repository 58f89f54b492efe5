use crate::id::{MachineId, ProductId};
use crate::layout::{Footprint, MachineSpec};

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// A unit of work travelling down the line. Owned by exactly one machine
/// while it is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: ProductId,
    /// Tick on which the first machine accepted it.
    pub admitted_at: u64,
}

// ---------------------------------------------------------------------------
// Machine state
// ---------------------------------------------------------------------------

/// Runtime state of a machine. A machine holds at most one product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MachineState {
    #[default]
    Idle,
    /// Processing `product`; `remaining` is always >= 1.
    Busy { product: Product, remaining: u32 },
    /// Finished `product` but the next machine could not take it.
    /// Only reachable under [`HandoffPolicy::Block`](crate::sim::HandoffPolicy).
    Blocked { product: Product },
}

/// The outcome of a single tick for a machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to do.
    Idle,
    /// Still processing.
    Working,
    /// Processing finished on this tick. Ownership moves to the caller.
    Completed(Product),
    /// A parked product is handed back for another delivery attempt.
    /// It was already counted when it completed.
    Retry(Product),
}

impl TickOutcome {
    pub fn into_product(self) -> Option<Product> {
        match self {
            TickOutcome::Completed(p) | TickOutcome::Retry(p) => Some(p),
            TickOutcome::Idle | TickOutcome::Working => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// A single-capacity station with a fixed processing time.
#[derive(Debug, Clone)]
pub struct Machine {
    spec: MachineSpec,
    state: MachineState,
    products_completed: u64,
}

impl Machine {
    pub fn new(spec: MachineSpec) -> Self {
        Self {
            spec,
            state: MachineState::Idle,
            products_completed: 0,
        }
    }

    pub fn id(&self) -> &MachineId {
        &self.spec.id
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn description(&self) -> &str {
        &self.spec.description
    }

    pub fn processing_time(&self) -> u32 {
        self.spec.processing_time
    }

    pub fn footprint(&self) -> &Footprint {
        &self.spec.footprint
    }

    /// Where a product held by this machine is displayed.
    pub fn center(&self) -> (f64, f64) {
        self.spec.footprint.center()
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, MachineState::Idle)
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self.state, MachineState::Blocked { .. })
    }

    /// The product this machine currently holds, busy or blocked.
    pub fn current_product(&self) -> Option<&Product> {
        match &self.state {
            MachineState::Idle => None,
            MachineState::Busy { product, .. } | MachineState::Blocked { product } => Some(product),
        }
    }

    /// Ticks left on the current product. Zero unless busy.
    pub fn time_remaining(&self) -> u32 {
        match &self.state {
            MachineState::Busy { remaining, .. } => *remaining,
            _ => 0,
        }
    }

    pub fn products_completed(&self) -> u64 {
        self.products_completed
    }

    /// Accept `product` if idle. A busy or blocked machine hands the
    /// product straight back.
    pub fn start_work(&mut self, product: Product) -> Result<(), Product> {
        if !self.is_idle() {
            return Err(product);
        }
        self.state = MachineState::Busy {
            product,
            remaining: self.spec.processing_time.max(1),
        };
        Ok(())
    }

    /// Park a finished product that could not be delivered downstream.
    /// Fails if the machine is not idle.
    pub fn hold(&mut self, product: Product) -> Result<(), Product> {
        if !self.is_idle() {
            return Err(product);
        }
        self.state = MachineState::Blocked { product };
        Ok(())
    }

    /// Advance by one tick.
    pub fn tick(&mut self) -> TickOutcome {
        match std::mem::take(&mut self.state) {
            MachineState::Idle => TickOutcome::Idle,
            MachineState::Busy { product, remaining } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.products_completed += 1;
                    TickOutcome::Completed(product)
                } else {
                    self.state = MachineState::Busy { product, remaining };
                    TickOutcome::Working
                }
            }
            MachineState::Blocked { product } => TickOutcome::Retry(product),
        }
    }
}
