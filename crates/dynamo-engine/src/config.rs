//! Plant construction parameters and validation.

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use dynamo_core::StatusSink;

/// Invalid plant configuration or a failed startup step.
#[derive(Debug)]
pub enum ConfigError {
    /// The tick period must be positive.
    InvalidTickPeriod {
        /// The rejected period.
        period: Duration,
    },
    /// The shutdown join timeout must be positive.
    ZeroJoinTimeout,
    /// The OS refused to spawn the tick worker thread.
    ThreadSpawnFailed {
        /// The OS error rendering.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTickPeriod { period } => {
                write!(f, "tick period must be positive, got {period:?}")
            }
            Self::ZeroJoinTimeout => write!(f, "join timeout must be positive"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "failed to spawn tick worker: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Construction parameters for a [`Plant`](crate::Plant).
///
/// `Default` gives the reference setup: a 300 ms tick, seed 0, a one
/// second shutdown join budget, no structure blob, and the `tracing`
/// status sink.
pub struct PlantConfig {
    /// Target time between tick starts.
    pub tick_period: Duration,
    /// Seed for the engine's deterministic random stream.
    pub seed: u64,
    /// How long `shutdown` waits for the worker to acknowledge.
    pub join_timeout: Duration,
    /// Opaque layout blob served verbatim by `static_structure`.
    pub structure: Option<serde_json::Value>,
    /// Status sink; `None` selects the `tracing`-backed default.
    pub sink: Option<Arc<dyn StatusSink>>,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            tick_period: Duration::from_millis(300),
            seed: 0,
            join_timeout: Duration::from_secs(1),
            structure: None,
            sink: None,
        }
    }
}

impl PlantConfig {
    /// Check the configuration before any thread is spawned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period.is_zero() {
            return Err(ConfigError::InvalidTickPeriod {
                period: self.tick_period,
            });
        }
        if self.join_timeout.is_zero() {
            return Err(ConfigError::ZeroJoinTimeout);
        }
        Ok(())
    }
}

impl fmt::Debug for PlantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlantConfig")
            .field("tick_period", &self.tick_period)
            .field("seed", &self.seed)
            .field("join_timeout", &self.join_timeout)
            .field("structure", &self.structure.is_some())
            .field("sink", &self.sink.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(PlantConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_tick_period_is_rejected() {
        let config = PlantConfig {
            tick_period: Duration::ZERO,
            ..PlantConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidTickPeriod { .. })
        ));
    }

    #[test]
    fn zero_join_timeout_is_rejected() {
        let config = PlantConfig {
            join_timeout: Duration::ZERO,
            ..PlantConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroJoinTimeout)));
    }
}
