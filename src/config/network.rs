use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub host: String,
    pub port: u16,
    pub reconnect: ReconnectPolicy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9000,
            reconnect: ReconnectPolicy::default(),
        }
    }
}

/// How long to wait before re-dialing after a fault.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReconnectPolicy {
    /// Same delay after every fault, retried forever.
    Fixed { delay_ms: u64 },
    /// Delay doubles per consecutive fault up to `max_ms`; a successful connect resets it.
    Exponential { initial_ms: u64, max_ms: u64 },
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy::Fixed { delay_ms: 1 }
    }
}

impl ReconnectPolicy {
    /// Delay before the retry that follows `failures` consecutive faults (1-based).
    pub fn delay(&self, failures: u32) -> Duration {
        match *self {
            ReconnectPolicy::Fixed { delay_ms } => Duration::from_millis(delay_ms),
            ReconnectPolicy::Exponential { initial_ms, max_ms } => {
                let shift = failures.saturating_sub(1).min(32);
                let ms = initial_ms.saturating_mul(1u64 << shift).min(max_ms);
                Duration::from_millis(ms)
            }
        }
    }
}
