use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How the forwarding task learns that a session has new events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStrategy {
    /// Check the buffer on a fixed interval.
    #[default]
    Poll,
    /// Wake as soon as an event is appended, falling back to the poll
    /// interval as an upper bound on latency.
    Notify,
}

/// Settings for `GET /events/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamConfig {
    #[serde(default)]
    pub delivery: DeliveryStrategy,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How long a session nobody subscribed to is kept before it is swept.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
    /// How often the sweep runs. Zero disables it.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_session_ttl_secs() -> u64 {
    300
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl StreamConfig {
    /// Never zero, so a misconfigured interval cannot spin the forwarder.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// `None` when sweeping is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            delivery: DeliveryStrategy::default(),
            poll_interval_ms: default_poll_interval_ms(),
            session_ttl_secs: default_session_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}
