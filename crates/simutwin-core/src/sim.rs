//! Simulation policy and configuration types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::DEFAULT_PROCESSING_TIME;

// ---------------------------------------------------------------------------
// Hand-off policy
// ---------------------------------------------------------------------------

/// What a machine does with a finished product when the next machine is
/// still busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandoffPolicy {
    /// The product is discarded. It leaves the registry without counting as
    /// finished.
    #[default]
    Drop,
    /// The product stays parked in the finishing machine, which reports
    /// itself as blocked and retries the hand-off every tick.
    Block,
}

impl fmt::Display for HandoffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HandoffPolicy::Drop => "drop",
            HandoffPolicy::Block => "block",
        })
    }
}

impl FromStr for HandoffPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(HandoffPolicy::Drop),
            "block" => Ok(HandoffPolicy::Block),
            other => Err(format!("unknown hand-off policy '{other}' (expected 'drop' or 'block')")),
        }
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

/// Per-session engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub handoff_policy: HandoffPolicy,
    /// Applied to machines whose processing time is missing or invalid.
    pub default_processing_time: u32,
}

impl SimulationConfig {
    pub fn new() -> Self {
        Self {
            handoff_policy: HandoffPolicy::default(),
            default_processing_time: DEFAULT_PROCESSING_TIME,
        }
    }

    pub fn with_handoff_policy(mut self, policy: HandoffPolicy) -> Self {
        self.handoff_policy = policy;
        self
    }

    /// Zero is not a usable processing time and is replaced by the
    /// built-in default.
    pub fn with_default_processing_time(mut self, ticks: u32) -> Self {
        self.default_processing_time = if ticks == 0 {
            DEFAULT_PROCESSING_TIME
        } else {
            ticks
        };
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.handoff_policy, HandoffPolicy::Drop);
        assert_eq!(config.default_processing_time, 5);
    }

    #[test]
    fn config_builder() {
        let config = SimulationConfig::new()
            .with_handoff_policy(HandoffPolicy::Block)
            .with_default_processing_time(8);
        assert_eq!(config.handoff_policy, HandoffPolicy::Block);
        assert_eq!(config.default_processing_time, 8);
    }

    #[test]
    fn zero_default_processing_time_is_replaced() {
        let config = SimulationConfig::new().with_default_processing_time(0);
        assert_eq!(config.default_processing_time, DEFAULT_PROCESSING_TIME);
    }

    #[test]
    fn handoff_policy_from_str() {
        assert_eq!("Block".parse::<HandoffPolicy>(), Ok(HandoffPolicy::Block));
        assert_eq!(HandoffPolicy::Drop.to_string().parse(), Ok(HandoffPolicy::Drop));
        assert!("queue".parse::<HandoffPolicy>().is_err());
    }

    #[test]
    fn handoff_policy_names() {
        assert_eq!(serde_json::to_string(&HandoffPolicy::Block).unwrap(), "\"block\"");
        let p: HandoffPolicy = serde_json::from_str("\"drop\"").unwrap();
        assert_eq!(p, HandoffPolicy::Drop);
    }
}
