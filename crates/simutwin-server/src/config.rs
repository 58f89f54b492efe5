//! Server configuration, loaded from an optional TOML file.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use simutwin_core::layout::DEFAULT_PROCESSING_TIME;
use simutwin_core::{HandoffPolicy, SimulationConfig};

use crate::error::ServerError;

pub const DEFAULT_PORT: u16 = 4000;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

/// Top-level server settings.
///
/// Every field is optional in the file; missing fields take the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
    /// Wall-clock length of one simulation tick.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default)]
    pub handoff_policy: HandoffPolicy,
    #[serde(default = "default_processing_time")]
    pub default_processing_time: u32,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_PORT))
}

fn default_tick_interval_ms() -> u64 {
    DEFAULT_TICK_INTERVAL_MS
}

fn default_processing_time() -> u32 {
    DEFAULT_PROCESSING_TIME
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            tick_interval_ms: default_tick_interval_ms(),
            handoff_policy: HandoffPolicy::default(),
            default_processing_time: default_processing_time(),
        }
    }
}

impl ServerConfig {
    /// Read and parse a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ServerError> {
        let text = std::fs::read_to_string(path).map_err(|e| ServerError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Self::from_toml_str(&text).map_err(|detail| ServerError::Config {
            path: path.to_path_buf(),
            detail,
        })
    }

    pub fn from_toml_str(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| e.to_string())
    }

    /// Tick period, never shorter than one millisecond.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Engine settings handed to every new session.
    pub fn simulation(&self) -> SimulationConfig {
        SimulationConfig::new()
            .with_handoff_policy(self.handoff_policy)
            .with_default_processing_time(self.default_processing_time)
    }
}
