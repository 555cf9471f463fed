//! Dotted `component.field` key conventions.
//!
//! Every variable key names a component instance and a field, joined
//! by a single dot: `generator1.temp`, `akku2.active`, `mixer.active`.
//! [`ComponentKind`] classifies the instance by its name prefix so the
//! gateway can look up cascade rules per component kind instead of
//! string-matching key suffixes.

/// Reserved diagnostic key: a truthy patch value triggers a full
/// snapshot dump to the operator-facing sink without mutating any
/// plant variable.
pub const DEBUG_DUMP_KEY: &str = "system.debug";

/// The component-instance part of a dotted key (`"akku1.value"` → `"akku1"`).
pub fn component(key: &str) -> &str {
    key.split_once('.').map_or(key, |(c, _)| c)
}

/// The field part of a dotted key (`"akku1.value"` → `"value"`).
pub fn field(key: &str) -> &str {
    key.split_once('.').map_or("", |(_, f)| f)
}

/// Classification of a component instance by name prefix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    /// A power generator (`generator1`..`generator3`).
    Generator,
    /// A battery / Akku energy store (`akku1`..`akku3`).
    Battery,
    /// The battery aggregator.
    Aggregator,
    /// The unit producer.
    Producer,
    /// The monotonic product counter.
    ProductCounter,
    /// The derived room-temperature model.
    Room,
    /// A chemical component in the mixing chain (`chemical1`..).
    Chemical,
    /// The chemical mixer.
    Mixer,
    /// The reserved `system` pseudo-component.
    System,
    /// Anything else, including dynamically inserted UI-only keys.
    Other,
}

impl ComponentKind {
    /// Classify a dotted key by its component-name prefix.
    pub fn of(key: &str) -> Self {
        let name = component(key);
        if name.starts_with("generator") {
            Self::Generator
        } else if name.starts_with("akku") {
            Self::Battery
        } else if name == "aggregator" {
            Self::Aggregator
        } else if name == "producer" {
            Self::Producer
        } else if name == "productCounter" {
            Self::ProductCounter
        } else if name == "room" {
            Self::Room
        } else if name.starts_with("chemical") {
            Self::Chemical
        } else if name == "mixer" {
            Self::Mixer
        } else if name == "system" {
            Self::System
        } else {
            Self::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_component_and_field() {
        assert_eq!(component("akku1.value"), "akku1");
        assert_eq!(field("akku1.value"), "value");
        assert_eq!(component("bare"), "bare");
        assert_eq!(field("bare"), "");
    }

    #[test]
    fn classifies_known_prefixes() {
        assert_eq!(ComponentKind::of("generator2.active"), ComponentKind::Generator);
        assert_eq!(ComponentKind::of("akku3.capacity"), ComponentKind::Battery);
        assert_eq!(ComponentKind::of("aggregator.value"), ComponentKind::Aggregator);
        assert_eq!(ComponentKind::of("producer.output"), ComponentKind::Producer);
        assert_eq!(ComponentKind::of("productCounter.value"), ComponentKind::ProductCounter);
        assert_eq!(ComponentKind::of("room.temp"), ComponentKind::Room);
        assert_eq!(ComponentKind::of("chemical1.purity"), ComponentKind::Chemical);
        assert_eq!(ComponentKind::of("mixer.mixture_quality"), ComponentKind::Mixer);
        assert_eq!(ComponentKind::of(DEBUG_DUMP_KEY), ComponentKind::System);
        assert_eq!(ComponentKind::of("unknownSensor.reading"), ComponentKind::Other);
    }
}
