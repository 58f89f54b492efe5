//! Per-connection session slot: at most one running simulation and its
//! tick clock.

use std::time::Duration;

use serde_json::Value;
use simutwin_core::event::LineEvent;
use simutwin_core::{SimError, Simulation, SimulationConfig, TickReport};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// A running simulation together with the clock that drives it.
struct ActiveSession {
    simulation: Simulation,
    clock: Interval,
}

/// Owns the connection's session, if any.
///
/// The clock lives inside the slot, so dropping the session also cancels
/// its ticks. No tick can fire for a session that has been replaced, reset
/// or closed.
pub struct SessionManager {
    config: SimulationConfig,
    period: Duration,
    active: Option<ActiveSession>,
}

impl SessionManager {
    pub fn new(config: SimulationConfig, period: Duration) -> Self {
        Self {
            config,
            period,
            active: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn simulation(&self) -> Option<&Simulation> {
        self.active.as_ref().map(|a| &a.simulation)
    }

    /// Start a simulation from an editor layout.
    ///
    /// Any running session is stopped first, even when the new layout is
    /// rejected. The first tick fires one period after the start.
    pub fn open(&mut self, layout: &Value) -> Result<(), SimError> {
        if let Some(previous) = self.active.take() {
            debug!(tick = previous.simulation.tick(), "stopping previous simulation");
        }

        let simulation = Simulation::from_json(layout, &self.config)?;
        for warning in simulation.warnings() {
            warn!(?warning, "layout entry adjusted");
        }
        let line = simulation.line();
        let bottlenecks: Vec<_> = line
            .machines()
            .iter()
            .filter(|m| line.is_bottleneck(m))
            .map(|m| m.id().to_string())
            .collect();
        info!(
            machines = line.len(),
            max_processing_time = line.max_processing_time(),
            ?bottlenecks,
            policy = %line.policy(),
            "simulation started"
        );

        let mut clock = time::interval_at(Instant::now() + self.period, self.period);
        clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.active = Some(ActiveSession { simulation, clock });
        Ok(())
    }

    /// Stop the running session. Returns whether one was running.
    pub fn reset_and_stop(&mut self) -> bool {
        match self.active.take() {
            Some(session) => {
                info!(
                    tick = session.simulation.tick(),
                    finished = session.simulation.total_finished(),
                    "simulation reset"
                );
                true
            }
            None => false,
        }
    }

    /// Release the session when the client goes away.
    pub fn close(&mut self) {
        if let Some(session) = self.active.take() {
            debug!(tick = session.simulation.tick(), "session closed");
        }
    }

    /// Wait for the next clock tick and advance the simulation by one step.
    ///
    /// Pends forever when no session is running. Cancel-safe: the step
    /// runs only after the clock has fired, within the same poll.
    pub async fn next_tick(&mut self) -> TickReport {
        let Some(active) = self.active.as_mut() else {
            return std::future::pending().await;
        };
        active.clock.tick().await;
        let report = active.simulation.step();
        log_events(&report.events);
        report
    }
}

fn log_events(events: &[LineEvent]) {
    for event in events {
        match event {
            LineEvent::Dropped { product, at, tick } => {
                debug!(%product, machine = %at, tick, "product dropped, next machine busy");
            }
            LineEvent::Blocked { product, at, tick } => {
                debug!(%product, machine = %at, tick, "machine blocked");
            }
            LineEvent::Finished { product, tick } => {
                debug!(%product, tick, "product finished");
            }
            _ => {}
        }
    }
}
