//! Lifetime product counter.

use crate::phase::{Phase, PhaseContext, PhaseError};

const NAME: &str = "productCounter";
const COUNTER_KEY: &str = "productCounter.value";
const OUTPUT_KEY: &str = "producer.output";

/// Accumulates the producer's per-tick output into the lifetime total.
///
/// The counter only ever grows: output is 0 or 1 and nothing in the
/// pipeline subtracts from it.
#[derive(Default)]
pub struct CounterPhase;

impl CounterPhase {
    /// Build the counter phase.
    pub fn new() -> Self {
        Self
    }
}

impl Phase for CounterPhase {
    fn name(&self) -> &str {
        NAME
    }

    fn step(&mut self, ctx: &mut PhaseContext<'_>) -> Result<(), PhaseError> {
        let total = ctx.vars.int(COUNTER_KEY)? + ctx.vars.int(OUTPUT_KEY)?;
        ctx.vars.set_int(COUNTER_KEY, total)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::testing::{ctx, plant, rng};

    #[test]
    fn accumulates_output_ticks() {
        let mut vars = plant();
        let mut rng = rng();
        let mut phase = CounterPhase::new();

        vars.set_int("producer.output", 1).unwrap();
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("productCounter.value").unwrap(), 2);

        vars.set_int("producer.output", 0).unwrap();
        phase.step(&mut ctx(&mut vars, &mut rng)).unwrap();
        assert_eq!(vars.int("productCounter.value").unwrap(), 2);
    }
}
