//! Observer configuration
//!
//! Intervals for the periodic producers and sizing for the broadcast
//! channels. Defaults match the production deployment: a 15-second
//! world heartbeat and a 5-second presence keep-alive.

use crate::errors::{WorldPulseError, WorldPulseResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the world observer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObserverConfig {
    /// Interval between world heartbeat publishes
    pub heartbeat_interval: Duration,

    /// Interval between unconditional presence re-publishes
    pub presence_interval: Duration,

    /// Per-subscriber buffer capacity of each broadcast channel.
    ///
    /// A subscriber that falls further behind than this drops its
    /// oldest pending values and resumes at the most recent.
    pub channel_capacity: usize,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(15),
            presence_interval: Duration::from_secs(5),
            channel_capacity: 64,
        }
    }
}

impl ObserverConfig {
    /// Validate the configuration.
    ///
    /// Intervals must be non-zero and the channel capacity must buffer
    /// at least one publish. Checked before any task is spawned.
    pub fn validate(&self) -> WorldPulseResult<()> {
        if self.heartbeat_interval.is_zero() {
            return Err(WorldPulseError::InvalidConfig {
                field: "heartbeat_interval",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.presence_interval.is_zero() {
            return Err(WorldPulseError::InvalidConfig {
                field: "presence_interval",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.channel_capacity == 0 {
            return Err(WorldPulseError::InvalidConfig {
                field: "channel_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = ObserverConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.heartbeat_interval, Duration::from_secs(15));
        assert_eq!(config.presence_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = ObserverConfig {
            heartbeat_interval: Duration::ZERO,
            ..ObserverConfig::default()
        };

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            WorldPulseError::InvalidConfig {
                field: "heartbeat_interval",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = ObserverConfig {
            channel_capacity: 0,
            ..ObserverConfig::default()
        };

        assert!(config.validate().is_err());
    }
}
