//! Unit production and battery draining.

use rand::Rng;
use smallvec::SmallVec;

use crate::phase::{Phase, PhaseContext, PhaseError};
use crate::phases::{active_battery_sum, BatteryKeys};

const NAME: &str = "producer";
const ACTIVE_KEY: &str = "producer.active";
const CONSUMPTION_KEY: &str = "producer.consumption";
const OUTPUT_KEY: &str = "producer.output";
const AGGREGATOR_ACTIVE_KEY: &str = "aggregator.active";
const AGGREGATOR_VALUE_KEY: &str = "aggregator.value";

/// Per-tick production attempt.
///
/// The producer fires when it and the aggregator are active and the
/// aggregated charge covers the consumption. Firing emits exactly one
/// unit and drains one battery, chosen uniformly at random among the
/// active batteries that hold any charge. The chosen battery gives up
/// `min(consumption, charge)`: the bank as a whole had enough, so a
/// shallow battery may cover only part of the cost and the unit still
/// ships. The aggregator total is recomputed after the drain so later
/// phases in the same tick see it.
pub struct ProducerPhase {
    batteries: Vec<BatteryKeys>,
}

impl ProducerPhase {
    /// Build the phase over the named batteries.
    pub fn new(batteries: &[&str]) -> Self {
        Self {
            batteries: batteries.iter().map(|b| BatteryKeys::new(b)).collect(),
        }
    }
}

impl Phase for ProducerPhase {
    fn name(&self) -> &str {
        NAME
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        let consumption = ctx.vars.int(CONSUMPTION_KEY)?;
        let can_fire = ctx.vars.flag(ACTIVE_KEY)?
            && ctx.vars.flag(AGGREGATOR_ACTIVE_KEY)?
            && ctx.vars.int(AGGREGATOR_VALUE_KEY)? >= consumption;
        if !can_fire {
            ctx.vars.set_int(OUTPUT_KEY, 0)?;
            return Ok(());
        }

        ctx.vars.set_int(OUTPUT_KEY, 1)?;

        let mut candidates: SmallVec<[usize; 4]> = SmallVec::new();
        for (i, battery) in self.batteries.iter().enumerate() {
            if ctx.vars.flag(&battery.active)? && ctx.vars.int(&battery.value)? > 0 {
                candidates.push(i);
            }
        }
        if !candidates.is_empty() {
            let chosen = &self.batteries[candidates[ctx.rng.gen_range(0..candidates.len())]];
            let charge = ctx.vars.int(&chosen.value)?;
            let drained = (charge - consumption.min(charge)).max(0);
            ctx.vars.set_int(&chosen.value, drained)?;
        }

        let total = active_battery_sum(ctx.vars, &self.batteries)?;
        ctx.vars.set_int(AGGREGATOR_VALUE_KEY, total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BATTERIES;
    use crate::phases::testing::{ctx, plant, rng};

    fn producer() -> ProducerPhase {
        let names: Vec<&str> = BATTERIES.iter().map(|(b, _)| *b).collect();
        ProducerPhase::new(&names)
    }

    #[test]
    fn fires_and_drains_the_only_charged_battery() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_int("akku2.value", 50).unwrap();
        vars.set_int("aggregator.value", 50).unwrap();

        producer().step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("producer.output").unwrap(), 1);
        assert_eq!(vars.int("akku2.value").unwrap(), 30);
        assert_eq!(vars.int("aggregator.value").unwrap(), 30);
    }

    #[test]
    fn shallow_battery_drains_to_zero_and_still_ships() {
        let mut vars = plant();
        let mut rng = rng();
        // The aggregator reports 25 (covers consumption 20), but the
        // only charged battery holds 12: partial drain, full unit.
        vars.set_int("akku1.value", 12).unwrap();
        vars.set_int("aggregator.value", 25).unwrap();

        producer().step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("producer.output").unwrap(), 1);
        assert_eq!(vars.int("akku1.value").unwrap(), 0);
    }

    #[test]
    fn holds_when_charge_is_insufficient() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_int("akku1.value", 19).unwrap();
        vars.set_int("aggregator.value", 19).unwrap();

        producer().step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("producer.output").unwrap(), 0);
        assert_eq!(vars.int("akku1.value").unwrap(), 19);
    }

    #[test]
    fn holds_when_inactive() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_int("akku1.value", 500).unwrap();
        vars.set_int("aggregator.value", 500).unwrap();
        vars.set_flag("producer.active", false).unwrap();

        producer().step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("producer.output").unwrap(), 0);
        assert_eq!(vars.int("akku1.value").unwrap(), 500);
    }

    #[test]
    fn holds_when_aggregator_is_inactive() {
        let mut vars = plant();
        let mut rng = rng();
        vars.set_int("akku1.value", 500).unwrap();
        vars.set_int("aggregator.value", 500).unwrap();
        vars.set_flag("aggregator.active", false).unwrap();

        producer().step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("producer.output").unwrap(), 0);
    }

    #[test]
    fn drain_choice_is_deterministic_for_a_fixed_seed() {
        let drained_with = |seed: u64| {
            let mut vars = plant();
            let mut rng = {
                use rand::SeedableRng;
                rand_chacha::ChaCha8Rng::seed_from_u64(seed)
            };
            for (battery, _) in BATTERIES {
                vars.set_int(&format!("{battery}.value"), 100).unwrap();
            }
            vars.set_int("aggregator.value", 300).unwrap();
            producer().step(&mut ctx(&mut vars, &mut rng)).unwrap();
            BATTERIES
                .iter()
                .map(|(b, _)| vars.int(&format!("{b}.value")).unwrap())
                .collect::<Vec<_>>()
        };

        assert_eq!(drained_with(42), drained_with(42));
        // Exactly one battery lost exactly the consumption.
        let after = drained_with(42);
        assert_eq!(after.iter().sum::<i64>(), 280);
        assert_eq!(after.iter().filter(|&&v| v == 80).count(), 1);
    }
}
