//! Per-tick timing metrics.

use dynamo_core::TickId;

/// Timing breakdown of one executed tick.
///
/// Captured by the engine on every successful tick and kept for the
/// most recent one; the worker traces it at debug level.
#[derive(Clone, Debug)]
pub struct TickMetrics {
    /// The tick these timings belong to.
    pub tick: TickId,
    /// Wall time of the whole tick, lock acquisition included.
    pub total_us: u64,
    /// Per-phase wall time, in execution order.
    pub phase_us: Vec<(String, u64)>,
}

impl TickMetrics {
    /// The slowest phase of this tick, if any phases ran.
    pub fn slowest_phase(&self) -> Option<(&str, u64)> {
        self.phase_us
            .iter()
            .max_by_key(|(_, us)| *us)
            .map(|(name, us)| (name.as_str(), *us))
    }
}
