use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifies a machine. Assigned by the layout editor and echoed back in
/// every update, so it is kept as the client's own string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MachineId(pub String);

impl MachineId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MachineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for MachineId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifies a product within one session. Sequence numbers start at 1 and
/// are rendered as `P-<n>` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A product id string that is not of the form `P-<n>`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid product id '{0}'")]
pub struct ParseProductIdError(pub String);

impl FromStr for ProductId {
    type Err = ParseProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix("P-")
            .and_then(|n| n.parse::<u64>().ok())
            .map(ProductId)
            .ok_or_else(|| ParseProductIdError(s.to_string()))
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
