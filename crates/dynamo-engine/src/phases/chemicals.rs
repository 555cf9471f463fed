//! Chemical reservoir upkeep.

use rand::Rng;

use crate::phase::{Phase, PhaseContext, PhaseError};
use crate::phases::round2;

/// Fill lost per tick while the reservoir is inactive.
const IDLE_DECAY: f64 = 0.5;
/// Purity drifts uniformly within this band per active tick.
const PURITY_JITTER: f64 = 0.5;
/// Purity bounds, matching the store's clamp policy.
const PURITY_MIN: f64 = 70.0;
const PURITY_MAX: f64 = 100.0;

/// Per-tick update of one chemical reservoir.
///
/// An inactive reservoir slowly loses fill toward empty. An active one
/// keeps its fill (consumption happens in the mixer phase) while its
/// purity wanders a little each tick, held inside the certified band.
pub struct ChemicalPhase {
    name: String,
    value_key: String,
    purity_key: String,
    active_key: String,
}

impl ChemicalPhase {
    /// Build the phase for one reservoir, e.g. `"chemical1"`.
    pub fn new(unit: &str) -> Self {
        Self {
            name: unit.to_string(),
            value_key: format!("{unit}.value"),
            purity_key: format!("{unit}.purity"),
            active_key: format!("{unit}.active"),
        }
    }
}

impl Phase for ChemicalPhase {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        if ctx.vars.flag(&self.active_key)? {
            let purity = ctx.vars.float(&self.purity_key)?;
            let drift = ctx.rng.gen_range(-PURITY_JITTER..=PURITY_JITTER);
            let next = (purity + drift).clamp(PURITY_MIN, PURITY_MAX);
            ctx.vars.set_float(&self.purity_key, round2(next))?;
        } else {
            let fill = ctx.vars.float(&self.value_key)?;
            if fill > 0.0 {
                ctx.vars
                    .set_float(&self.value_key, round2((fill - IDLE_DECAY).max(0.0)))?;
            }
        }
        Ok(())
    }
}
