/// Session configuration
use serde::{Deserialize, Serialize};
use soundroom_playback::MachineSettings;
use soundroom_sync::BackoffPolicy;
use std::time::Duration;

/// Per-room session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Provider registry name used for new rooms
    pub provider: String,

    /// Retry policy for login, advancement and delivery
    pub backoff: BackoffPolicy,

    /// Playback state machine settings
    pub machine: MachineSettings,

    /// Upper bound on a catalog call (seconds)
    pub catalog_timeout_secs: u64,

    /// Pending commands buffered per room
    pub command_channel_depth: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            backoff: BackoffPolicy::default(),
            machine: MachineSettings::default(),
            catalog_timeout_secs: 10,
            command_channel_depth: 64,
        }
    }
}

impl SessionConfig {
    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs.max(1))
    }
}

fn default_provider() -> String {
    "simulated".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.provider, "simulated");
        assert_eq!(config.catalog_timeout(), Duration::from_secs(10));
        assert_eq!(config.command_channel_depth, 64);
        assert_eq!(config.backoff.max_retry_interval_secs, 30);
        assert_eq!(config.backoff.slow_connection_retries, 2);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{ "machine": { "watchdog_grace_secs": 9 } }"#).unwrap();
        assert_eq!(config.machine.watchdog_grace_secs, 9);
        assert_eq!(config.machine.sample_interval_ms, 900);
        assert_eq!(config.provider, "simulated");
    }
}
