//! Aggregated charge total across the battery bank.

use crate::phase::{Phase, PhaseContext, PhaseError};
use crate::phases::{active_battery_sum, BatteryKeys};

/// Per-tick recomputation of the bank-wide charge total.
///
/// The aggregator value is derived state: the sum of active batteries'
/// charge, with inactive batteries contributing zero. An inactive
/// aggregator reports zero regardless of the bank.
pub struct AggregatorPhase {
    batteries: Vec<BatteryKeys>,
}

const NAME: &str = "aggregator";
const VALUE_KEY: &str = "aggregator.value";
const ACTIVE_KEY: &str = "aggregator.active";

impl AggregatorPhase {
    /// Build the phase over the named batteries.
    pub fn new(batteries: &[&str]) -> Self {
        Self {
            batteries: batteries.iter().map(|b| BatteryKeys::new(b)).collect(),
        }
    }
}

impl Phase for AggregatorPhase {
    fn name(&self) -> &str {
        NAME
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        let total = if ctx.vars.flag(ACTIVE_KEY)? {
            active_battery_sum(ctx.vars, &self.batteries)?
        } else {
            0
        };
        ctx.vars.set_int(VALUE_KEY, total)?;
        Ok(())
    }
}
