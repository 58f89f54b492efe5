//! SimuTwin Core -- the simulation engine for linear production lines.
//!
//! A line is a fixed chain of single-capacity machines. Products enter at
//! the first machine, move one machine per tick, and leave after the last.
//! The machine(s) with the longest processing time are reported as the
//! line's bottleneck.
//!
//! # Tick Pipeline
//!
//! Each call to [`session::Simulation::step`] runs:
//!
//! 1. **Advance** -- machines tick from last to first; finished products are
//!    handed downstream or leave the line.
//! 2. **Admit** -- one new product is offered to the first machine.
//! 3. **Place** -- products are positioned at the centre of their machine.
//! 4. **Report** -- a [`query::Snapshot`] and the tick's [`event::LineEvent`]s.
//!
//! # Key Types
//!
//! - [`layout::Layout`] -- Editor payload parsed into strict machine specs.
//! - [`machine::Machine`] -- Idle / Busy / Blocked station state machine.
//! - [`line::ProductionLine`] -- Ordered machines, advancement, bottlenecks.
//! - [`session::Simulation`] -- One run: registry, counters, tick clock.
//! - [`sim::HandoffPolicy`] -- Drop or block when the next machine is busy.
//!
//! This crate does no I/O and never sleeps; callers drive the clock.

pub mod error;
pub mod event;
pub mod id;
pub mod layout;
pub mod line;
pub mod machine;
pub mod query;
pub mod session;
pub mod sim;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::SimError;
pub use session::{Simulation, TickReport};
pub use sim::{HandoffPolicy, SimulationConfig};
