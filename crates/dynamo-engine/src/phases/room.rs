//! Room temperature model and the thermal safety cutoff.

use crate::phase::{Phase, PhaseContext, PhaseError};
use crate::phases::round2;

/// Room temperature above which the battery bank is cut off.
const CUTOFF_TEMP: f64 = 110.0;

/// Derives the room temperature as the mean of the generator temps.
pub struct RoomPhase {
    generator_temp_keys: Vec<String>,
}

impl RoomPhase {
    /// Build the phase over the named generator units.
    pub fn new(generators: &[&str]) -> Self {
        Self {
            generator_temp_keys: generators.iter().map(|g| format!("{g}.temp")).collect(),
        }
    }
}

impl Phase for RoomPhase {
    fn name(&self) -> &str {
        "room"
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        let mut sum = 0.0;
        for key in &self.generator_temp_keys {
            sum += ctx.vars.float(key)?;
        }
        let mean = sum / self.generator_temp_keys.len() as f64;
        ctx.vars.set_float("room.temp", round2(mean))?;
        Ok(())
    }
}

/// Trips every battery inactive once the room overheats.
///
/// One-way and idempotent: the cutoff never reactivates the bank, an
/// operator has to switch the batteries back on once the room cools.
pub struct SafetyPhase {
    battery_active_keys: Vec<String>,
}

impl SafetyPhase {
    /// Build the phase over the named batteries.
    pub fn new(batteries: &[&str]) -> Self {
        Self {
            battery_active_keys: batteries.iter().map(|b| format!("{b}.active")).collect(),
        }
    }
}

impl Phase for SafetyPhase {
    fn name(&self) -> &str {
        "safety"
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        if ctx.vars.float("room.temp")? > CUTOFF_TEMP {
            for key in &self.battery_active_keys {
                ctx.vars.set_flag(key, false)?;
            }
        }
        Ok(())
    }
}
