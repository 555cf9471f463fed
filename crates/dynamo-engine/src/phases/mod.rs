//! The reference phases of the energy-plant pipeline.
//!
//! Order matters and is fixed by `layout::default_phases`: generators
//! heat and produce, batteries charge, the aggregator sums, the
//! producer drains and emits, the counter accumulates, the room
//! averages, the safety cutoff trips, and the chemical chain mixes.
//! Each phase in one tick sees the writes of the phases before it.

pub mod aggregator;
pub mod batteries;
pub mod chemicals;
pub mod counter;
pub mod generators;
pub mod mixer;
pub mod producer;
pub mod room;

pub use aggregator::AggregatorPhase;
pub use batteries::BatteryPhase;
pub use chemicals::ChemicalPhase;
pub use counter::CounterPhase;
pub use generators::GeneratorPhase;
pub use mixer::MixerPhase;
pub use producer::ProducerPhase;
pub use room::{RoomPhase, SafetyPhase};

use dynamo_core::VarError;
use dynamo_store::VarStore;

/// Round to two decimal places, the precision every derived float in
/// the plant is kept at.
pub(crate) fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Precomputed key strings for one battery, built once per phase.
pub(crate) struct BatteryKeys {
    pub(crate) value: String,
    pub(crate) active: String,
}

impl BatteryKeys {
    pub(crate) fn new(battery: &str) -> Self {
        Self {
            value: format!("{battery}.value"),
            active: format!("{battery}.active"),
        }
    }
}

/// Sum of the charge held by the active batteries in `batteries`.
///
/// Inactive batteries contribute zero even when they still hold charge.
pub(crate) fn active_battery_sum(
    vars: &VarStore,
    batteries: &[BatteryKeys],
) -> Result<i64, VarError> {
    let mut total = 0;
    for battery in batteries {
        if vars.flag(&battery.active)? {
            total += vars.int(&battery.value)?;
        }
    }
    Ok(total)
}

#[cfg(test)]
pub(crate) mod testing {
    use dynamo_core::TickId;
    use dynamo_store::VarStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::layout::initial_store;
    use crate::phase::PhaseContext;

    pub(crate) fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    pub(crate) fn plant() -> VarStore {
        initial_store()
    }

    pub(crate) fn ctx<'a>(
        vars: &'a mut VarStore,
        rng: &'a mut ChaCha8Rng,
    ) -> PhaseContext<'a> {
        PhaseContext {
            vars,
            rng,
            tick: TickId(1),
        }
    }
}
