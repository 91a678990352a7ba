//! Settings for the playback state machine

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Playback state machine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineSettings {
    /// Delay before the first progress sample after play or resume (ms)
    pub first_sample_delay_ms: u64,

    /// Interval between progress samples while playing (ms)
    pub sample_interval_ms: u64,

    /// A track counts as finished once this close to its end (seconds)
    pub end_epsilon_seconds: f64,

    /// Extra time past the expected end before the watchdog force-ends a
    /// silent provider (seconds)
    pub watchdog_grace_secs: u64,

    /// Upper bound on a single provider call (ms)
    pub provider_call_timeout_ms: u64,

    /// Developer switch: after loading a track, seek to this many seconds
    /// before its end
    pub skip_to_tail_seconds: Option<f64>,
}

impl Default for MachineSettings {
    fn default() -> Self {
        Self {
            first_sample_delay_ms: 50,
            sample_interval_ms: 900,
            end_epsilon_seconds: 0.5,
            watchdog_grace_secs: 5,
            provider_call_timeout_ms: 5_000,
            skip_to_tail_seconds: None,
        }
    }
}

impl MachineSettings {
    /// Delay before the first progress sample
    pub fn first_sample_delay(&self) -> Duration {
        Duration::from_millis(self.first_sample_delay_ms)
    }

    /// Interval between progress samples
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms.max(1))
    }

    /// Watchdog grace period
    pub fn watchdog_grace(&self) -> Duration {
        Duration::from_secs(self.watchdog_grace_secs)
    }

    /// Upper bound on a single provider call
    pub fn provider_call_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_call_timeout_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = MachineSettings::default();
        assert_eq!(settings.first_sample_delay(), Duration::from_millis(50));
        assert_eq!(settings.sample_interval(), Duration::from_millis(900));
        assert_eq!(settings.watchdog_grace(), Duration::from_secs(5));
        assert_eq!(settings.end_epsilon_seconds, 0.5);
        assert!(settings.skip_to_tail_seconds.is_none());
    }
}
