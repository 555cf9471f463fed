//! Generator heating, cooling, and the overheat trip.

use crate::phase::{Phase, PhaseContext, PhaseError};
use crate::phases::round2;

/// Ambient baseline a generator's temperature never drops below.
const BASELINE_TEMP: f64 = 20.0;
/// Cooling per tick while inactive and above the baseline.
const COOL_STEP: f64 = 0.1;
/// Output level at which an active generator neither heats nor cools.
const NEUTRAL_OUTPUT: f64 = 3.0;
/// Heating per tick is `(value - NEUTRAL_OUTPUT) / HEAT_DIVISOR`.
const HEAT_DIVISOR: f64 = 20.0;
/// Temperature above which the generator trips inactive.
const OVERHEAT_TEMP: f64 = 120.0;

/// Per-tick update of one generator unit.
///
/// Inactive units hold their output at zero and cool toward the
/// ambient baseline. Active units heat or cool proportionally to how
/// far their output sits from the neutral level. The overheat trip
/// runs last, after the branch update, so a unit that crosses the
/// limit still reports this tick's temperature and charges its
/// battery once more before going dark.
pub struct GeneratorPhase {
    name: String,
    value_key: String,
    temp_key: String,
    active_key: String,
}

impl GeneratorPhase {
    /// Build the phase for one generator unit, e.g. `"generator1"`.
    pub fn new(unit: &str) -> Self {
        Self {
            name: unit.to_string(),
            value_key: format!("{unit}.value"),
            temp_key: format!("{unit}.temp"),
            active_key: format!("{unit}.active"),
        }
    }
}

impl Phase for GeneratorPhase {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        if ctx.vars.flag(&self.active_key)? {
            let value = ctx.vars.int(&self.value_key)? as f64;
            let temp = ctx.vars.float(&self.temp_key)?;
            let heated = temp + (value - NEUTRAL_OUTPUT) / HEAT_DIVISOR;
            ctx.vars
                .set_float(&self.temp_key, round2(heated.max(BASELINE_TEMP)))?;
        } else {
            ctx.vars.set_int(&self.value_key, 0)?;
            let temp = ctx.vars.float(&self.temp_key)?;
            if temp > BASELINE_TEMP {
                let cooled = (temp - COOL_STEP).max(BASELINE_TEMP);
                ctx.vars.set_float(&self.temp_key, round2(cooled))?;
            }
        }

        if ctx.vars.float(&self.temp_key)? > OVERHEAT_TEMP {
            ctx.vars.set_flag(&self.active_key, false)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::testing::{ctx, plant, rng};

    #[test]
    fn active_generator_heats_by_output_offset() {
        let mut vars = plant();
        let mut rng = rng();
        let mut phase = GeneratorPhase::new("generator1");

        // value 5, temp 20.1: (5 - 3) / 20 = 0.1 per tick.
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.float("generator1.temp").unwrap(), 20.2);
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.float("generator1.temp").unwrap(), 20.3);
    }

    #[test]
    fn low_output_generator_cools_but_not_below_baseline() {
        let mut vars = plant();
        let mut rng = rng();
        // generator3: value 4 heats; drop it to 1 so (1 - 3) / 20 cools.
        vars.set_int("generator3.value", 1).unwrap();
        let mut phase = GeneratorPhase::new("generator3");

        // 19.9 + (1 - 3) / 20 = 19.8, lifted to the 20.0 baseline.
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.float("generator3.temp").unwrap(), 20.0);
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.float("generator3.temp").unwrap(), 20.0);
    }

    #[test]
    fn inactive_generator_zeroes_output_and_cools() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_flag("generator1.active", false).unwrap();
        vars.set_float("generator1.temp", 20.35).unwrap();
        let mut phase = GeneratorPhase::new("generator1");

        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("generator1.value").unwrap(), 0);
        assert_eq!(vars.float("generator1.temp").unwrap(), 20.25);

        // Cooling stops at the baseline.
        for _ in 0..10 {
            phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        }
        assert_eq!(vars.float("generator1.temp").unwrap(), 20.0);
    }

    #[test]
    fn overheat_trips_after_the_branch_update() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_float("generator1.temp", 119.99).unwrap();
        vars.set_int("generator1.value", 10).unwrap();
        let mut phase = GeneratorPhase::new("generator1");

        // 119.99 + (10 - 3) / 20 = 120.34 > 120: trips this tick,
        // but the temperature update still landed.
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.float("generator1.temp").unwrap(), 120.34);
        assert!(!vars.flag("generator1.active").unwrap());
        // Output is still the user value this tick; the next step pins it.
        assert_eq!(vars.int("generator1.value").unwrap(), 10);

        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("generator1.value").unwrap(), 0);
        assert_eq!(vars.float("generator1.temp").unwrap(), 120.24);
    }
}
