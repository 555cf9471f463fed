//! Battery charging from the paired generator.

use crate::phase::{Phase, PhaseContext, PhaseError};

/// Per-tick charge of one battery from its paired generator.
///
/// An active battery below capacity absorbs the generator's whole
/// output for the tick, clamped to capacity. Inactive or full
/// batteries absorb nothing; the surplus is simply lost. The pairing
/// is fixed: akku1 charges from generator1, and so on.
pub struct BatteryPhase {
    name: String,
    value_key: String,
    active_key: String,
    capacity_key: String,
    generator_value_key: String,
}

impl BatteryPhase {
    /// Build the phase for one battery and its paired generator.
    pub fn new(battery: &str, generator: &str) -> Self {
        Self {
            name: battery.to_string(),
            value_key: format!("{battery}.value"),
            active_key: format!("{battery}.active"),
            capacity_key: format!("{battery}.capacity"),
            generator_value_key: format!("{generator}.value"),
        }
    }
}

impl Phase for BatteryPhase {
    fn name(&self) -> &str {
        &self.name
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        if !ctx.vars.flag(&self.active_key)? {
            return Ok(());
        }
        let charge = ctx.vars.int(&self.value_key)?;
        let capacity = ctx.vars.int(&self.capacity_key)?;
        if charge >= capacity {
            return Ok(());
        }
        let gain = ctx.vars.int(&self.generator_value_key)?;
        ctx.vars
            .set_int(&self.value_key, (charge + gain).min(capacity))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::testing::{ctx, plant, rng};

    #[test]
    fn active_battery_absorbs_generator_output() {
        let mut vars = plant();
        let mut rng = rng();
        let mut phase = BatteryPhase::new("akku1", "generator1");

        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("akku1.value").unwrap(), 5);
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("akku1.value").unwrap(), 10);
    }

    #[test]
    fn charge_is_clamped_to_capacity() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_int("akku1.value", 9998).unwrap();
        let mut phase = BatteryPhase::new("akku1", "generator1");

        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("akku1.value").unwrap(), 10_000);

        // Full: the next tick's output is lost.
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("akku1.value").unwrap(), 10_000);
    }

    #[test]
    fn inactive_battery_does_not_charge() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_flag("akku1.active", false).unwrap();
        let mut phase = BatteryPhase::new("akku1", "generator1");

        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("akku1.value").unwrap(), 0);
    }
}
