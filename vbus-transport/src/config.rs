//!
//! Bus Driver Tunables.
//!

use serde::{Deserialize, Serialize};

/// The tunable parameters of a node's bus driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// How often the node publishes its owned signals (ms)
    pub send_interval_ms: u32,
    /// The most inbound frames dispatched per node update, so a chatty
    /// bus can never starve the publish step
    pub receive_batch_limit: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            send_interval_ms: 25,
            receive_batch_limit: 16,
        }
    }
}
