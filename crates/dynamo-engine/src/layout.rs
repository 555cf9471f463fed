//! The reference plant: initial variables and the phase pipeline.

use dynamo_core::{Clamp, Value};
use dynamo_store::VarStore;

use crate::phase::Phase;
use crate::phases::{
    AggregatorPhase, BatteryPhase, ChemicalPhase, CounterPhase, GeneratorPhase, MixerPhase,
    ProducerPhase, RoomPhase, SafetyPhase,
};

/// The generator units, in pipeline order.
pub const GENERATORS: [&str; 3] = ["generator1", "generator2", "generator3"];

/// The batteries and the generator each one charges from.
pub const BATTERIES: [(&str, &str); 3] = [
    ("akku1", "generator1"),
    ("akku2", "generator2"),
    ("akku3", "generator3"),
];

/// The chemical reservoirs feeding the mixer.
pub const CHEMICALS: [&str; 2] = ["chemical1", "chemical2"];

/// The reference plant's variables, starting values, and clamps.
///
/// Clamps bind external writes through the gateway; the engine's own
/// arithmetic enforces its bounds inline.
pub fn initial_store() -> VarStore {
    let mut store = VarStore::new();

    let generator_starts = [(5, 20.1), (6, 20.1), (4, 19.9)];
    for (unit, (value, temp)) in GENERATORS.iter().zip(generator_starts) {
        store.define(
            &format!("{unit}.value"),
            Value::Int(value),
            Some(Clamp::range(0.0, 10.0)),
        );
        store.define(
            &format!("{unit}.temp"),
            Value::Float(temp),
            Some(Clamp::at_least(20.0)),
        );
        store.define(&format!("{unit}.active"), Value::Bool(true), None);
    }

    for (battery, _) in BATTERIES {
        store.define(&format!("{battery}.capacity"), Value::Int(10_000), None);
        store.define(
            &format!("{battery}.value"),
            Value::Int(0),
            Some(Clamp::at_least(0.0)),
        );
        store.define(&format!("{battery}.active"), Value::Bool(true), None);
    }

    store.define("aggregator.value", Value::Int(0), Some(Clamp::at_least(0.0)));
    store.define("aggregator.active", Value::Bool(true), None);

    store.define(
        "producer.consumption",
        Value::Int(20),
        Some(Clamp::range(1.0, 10.0)),
    );
    store.define("producer.output", Value::Int(0), Some(Clamp::range(0.0, 1.0)));
    store.define("producer.active", Value::Bool(true), None);

    store.define(
        "productCounter.value",
        Value::Int(0),
        Some(Clamp::at_least(0.0)),
    );

    store.define("room.temp", Value::Float(20.0), None);

    let chemical_starts = [(80.0, 95.0, 30.0), (60.0, 88.0, 25.0)];
    for (unit, (value, purity, output)) in CHEMICALS.iter().zip(chemical_starts) {
        store.define(
            &format!("{unit}.value"),
            Value::Float(value),
            Some(Clamp::range(0.0, 100.0)),
        );
        store.define(
            &format!("{unit}.purity"),
            Value::Float(purity),
            Some(Clamp::range(70.0, 100.0)),
        );
        store.define(
            &format!("{unit}.output"),
            Value::Float(output),
            Some(Clamp::range(0.0, 100.0)),
        );
        store.define(&format!("{unit}.active"), Value::Bool(true), None);
    }

    store.define("mixer.active", Value::Bool(true), None);
    store.define("mixer.max_throughput", Value::Float(50.0), None);
    store.define(
        "mixer.mixture_quality",
        Value::Float(0.0),
        Some(Clamp::range(0.0, 100.0)),
    );

    store
}

/// The reference pipeline, in the order phases execute each tick.
pub fn default_phases() -> Vec<Box<dyn Phase>> {
    let battery_names: Vec<&str> = BATTERIES.iter().map(|(b, _)| *b).collect();

    let mut phases: Vec<Box<dyn Phase>> = Vec::new();
    for unit in GENERATORS {
        phases.push(Box::new(GeneratorPhase::new(unit)));
    }
    for (battery, generator) in BATTERIES {
        phases.push(Box::new(BatteryPhase::new(battery, generator)));
    }
    phases.push(Box::new(AggregatorPhase::new(&battery_names)));
    phases.push(Box::new(ProducerPhase::new(&battery_names)));
    phases.push(Box::new(CounterPhase::new()));
    phases.push(Box::new(RoomPhase::new(&GENERATORS)));
    phases.push(Box::new(SafetyPhase::new(&battery_names)));
    for unit in CHEMICALS {
        phases.push(Box::new(ChemicalPhase::new(unit)));
    }
    phases.push(Box::new(MixerPhase::new(&CHEMICALS)));
    phases
}
