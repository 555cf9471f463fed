//! Validated mutation path for external writes.
//!
//! All writes from outside the tick loop go through the [`Gateway`]:
//! raw JSON values are coerced to the target variable's kind, clamped
//! by the variable's policy, and followed by cascade rules that keep
//! dependent fields consistent (deactivating a generator zeroes its
//! output, a battery charge never exceeds its capacity). Unknown keys
//! are accepted and inserted with naturally-inferred kinds so the
//! frontend can stash UI-only state in the same map.

use indexmap::IndexMap;

use dynamo_core::{
    key, CoerceError, ComponentKind, StatusSink, Value, DEBUG_DUMP_KEY,
};

use crate::store::VarStore;

// ── Cascade rules ────────────────────────────────────────────────

enum CascadeAction {
    /// Writing `false` to `<c>.active` also writes `0` to `<c>.value`.
    ZeroValueOnFalse,
    /// After writing `<c>.value`, cap it at the component's
    /// `<c>.capacity` variable.
    CapValueAtCapacity,
}

struct CascadeRule {
    kind: ComponentKind,
    field: &'static str,
    action: CascadeAction,
}

const CASCADES: &[CascadeRule] = &[
    CascadeRule {
        kind: ComponentKind::Generator,
        field: "active",
        action: CascadeAction::ZeroValueOnFalse,
    },
    CascadeRule {
        kind: ComponentKind::Battery,
        field: "value",
        action: CascadeAction::CapValueAtCapacity,
    },
];

// ── Results ──────────────────────────────────────────────────────

/// Outcome of applying one patch key.
#[derive(Debug, PartialEq)]
pub enum ApplyResult {
    /// The write landed; `cascaded` lists any extra keys it touched.
    Applied {
        /// Keys mutated by cascade rules, beyond the patched key itself.
        cascaded: Vec<String>,
    },
    /// The raw value could not be coerced; nothing changed.
    Rejected {
        /// Why coercion failed.
        reason: CoerceError,
    },
}

/// Outcome of applying a whole patch map.
#[derive(Debug, Default)]
pub struct PatchReport {
    /// Every key mutated, in application order, cascade targets included.
    pub applied: Vec<String>,
    /// Keys whose raw values could not be coerced, with the reason.
    pub rejected: Vec<(String, CoerceError)>,
}

// ── Gateway ──────────────────────────────────────────────────────

/// Coerces, clamps, and cascades external writes into a [`VarStore`].
///
/// Stateless; the rule table is fixed at compile time.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gateway;

impl Gateway {
    /// Create a gateway with the standard cascade rules.
    pub fn new() -> Self {
        Self
    }

    /// Apply one raw key/value pair to the store.
    ///
    /// Existing keys are coerced to their fixed kind and clamped;
    /// unknown keys are inserted with the raw value's natural kind.
    /// Cascade rules fire after the primary write and their targets
    /// are reported in [`ApplyResult::Applied`].
    pub fn apply(&self, vars: &mut VarStore, key: &str, raw: &serde_json::Value) -> ApplyResult {
        if !vars.contains(key) {
            return match Value::from_json(raw) {
                Ok(value) => {
                    vars.insert_dynamic(key, value);
                    ApplyResult::Applied { cascaded: Vec::new() }
                }
                Err(reason) => ApplyResult::Rejected { reason },
            };
        }

        // contains() held above, so kind() is present.
        let Some(kind) = vars.kind(key) else {
            return ApplyResult::Rejected {
                reason: CoerceError::unsupported(raw),
            };
        };
        let coerced = match Value::coerce_json(raw, kind) {
            Ok(value) => value,
            Err(reason) => return ApplyResult::Rejected { reason },
        };
        let bounded = match vars.clamp_of(key) {
            Some(clamp) => clamp.apply(coerced),
            None => coerced,
        };
        vars.put(key, bounded);

        ApplyResult::Applied {
            cascaded: self.run_cascades(vars, key, bounded),
        }
    }

    /// Apply a whole patch map under one lock acquisition.
    ///
    /// The reserved diagnostic key is intercepted here: a truthy value
    /// triggers a snapshot dump on `sink` and counts as applied without
    /// mutating the store. Rejected keys are reported to the sink and
    /// never abort the rest of the batch.
    pub fn apply_batch(
        &self,
        vars: &mut VarStore,
        patch: &IndexMap<String, serde_json::Value>,
        sink: &dyn StatusSink,
    ) -> PatchReport {
        let mut report = PatchReport::default();
        for (key, raw) in patch {
            if key == DEBUG_DUMP_KEY {
                if dynamo_core::json_is_truthy(raw) {
                    sink.status_dump(&vars.snapshot());
                }
                report.applied.push(key.clone());
                continue;
            }
            match self.apply(vars, key, raw) {
                ApplyResult::Applied { cascaded } => {
                    report.applied.push(key.clone());
                    report.applied.extend(cascaded);
                }
                ApplyResult::Rejected { reason } => {
                    sink.patch_rejected(key, &reason.to_string());
                    report.rejected.push((key.clone(), reason));
                }
            }
        }
        report
    }

    fn run_cascades(&self, vars: &mut VarStore, written: &str, value: Value) -> Vec<String> {
        let component = key::component(written);
        let field = key::field(written);
        let kind = ComponentKind::of(written);
        let mut touched = Vec::new();

        for rule in CASCADES {
            if rule.kind != kind || rule.field != field {
                continue;
            }
            match rule.action {
                CascadeAction::ZeroValueOnFalse => {
                    if value == Value::Bool(false) {
                        let target = format!("{component}.value");
                        // Same apply path as a direct patch, so the
                        // target's own coercion and clamp still hold.
                        if vars.contains(&target) {
                            if let ApplyResult::Applied { cascaded } =
                                self.apply(vars, &target, &serde_json::Value::from(0))
                            {
                                touched.push(target);
                                touched.extend(cascaded);
                            }
                        }
                    }
                }
                CascadeAction::CapValueAtCapacity => {
                    let capacity_key = format!("{component}.capacity");
                    let charge = value.as_int();
                    if let (Ok(capacity), Some(charge)) =
                        (vars.int(&capacity_key), charge)
                    {
                        if charge > capacity {
                            vars.put(written, Value::Int(capacity));
                            touched.push(written.to_string());
                        }
                    }
                }
            }
        }
        touched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynamo_core::{Clamp, Snapshot, TickId};
    use serde_json::json;
    use std::sync::Mutex;

    fn plant_store() -> VarStore {
        let mut store = VarStore::new();
        store.define("generator1.value", Value::Int(5), Some(Clamp::range(0.0, 10.0)));
        store.define("generator1.temp", Value::Float(20.1), Some(Clamp::at_least(20.0)));
        store.define("generator1.active", Value::Bool(true), None);
        store.define("akku1.capacity", Value::Int(10_000), None);
        store.define("akku1.value", Value::Int(250), None);
        store.define("akku1.active", Value::Bool(true), None);
        store.define("producer.consumption", Value::Int(20), Some(Clamp::range(1.0, 10.0)));
        store
    }

    #[derive(Default)]
    struct RecordingSink {
        dumps: Mutex<Vec<usize>>,
        rejections: Mutex<Vec<String>>,
    }

    impl StatusSink for RecordingSink {
        fn status_dump(&self, snapshot: &Snapshot) {
            self.dumps.lock().unwrap().push(snapshot.len());
        }
        fn tick_failed(&self, _tick: TickId, _reason: &str) {}
        fn patch_rejected(&self, key: &str, _reason: &str) {
            self.rejections.lock().unwrap().push(key.to_string());
        }
    }

    #[test]
    fn string_patch_coerces_to_variable_kind() {
        let mut vars = plant_store();
        let result = Gateway::new().apply(&mut vars, "generator1.value", &json!("7"));
        assert_eq!(result, ApplyResult::Applied { cascaded: vec![] });
        assert_eq!(vars.int("generator1.value").unwrap(), 7);
    }

    #[test]
    fn patch_is_clamped_by_policy() {
        let mut vars = plant_store();
        Gateway::new().apply(&mut vars, "generator1.value", &json!(99));
        assert_eq!(vars.int("generator1.value").unwrap(), 10);

        Gateway::new().apply(&mut vars, "producer.consumption", &json!(0));
        assert_eq!(vars.int("producer.consumption").unwrap(), 1);
    }

    #[test]
    fn deactivating_generator_zeroes_its_output() {
        let mut vars = plant_store();
        let result = Gateway::new().apply(&mut vars, "generator1.active", &json!("false"));
        assert_eq!(
            result,
            ApplyResult::Applied {
                cascaded: vec!["generator1.value".to_string()]
            }
        );
        assert!(!vars.flag("generator1.active").unwrap());
        assert_eq!(vars.int("generator1.value").unwrap(), 0);
    }

    #[test]
    fn reactivating_generator_does_not_cascade() {
        let mut vars = plant_store();
        let result = Gateway::new().apply(&mut vars, "generator1.active", &json!(true));
        assert_eq!(result, ApplyResult::Applied { cascaded: vec![] });
        assert_eq!(vars.int("generator1.value").unwrap(), 5);
    }

    #[test]
    fn battery_charge_is_capped_at_capacity() {
        let mut vars = plant_store();
        let result = Gateway::new().apply(&mut vars, "akku1.value", &json!(25_000));
        assert_eq!(
            result,
            ApplyResult::Applied {
                cascaded: vec!["akku1.value".to_string()]
            }
        );
        assert_eq!(vars.int("akku1.value").unwrap(), 10_000);
    }

    #[test]
    fn unknown_key_inserts_with_natural_kind() {
        let mut vars = plant_store();
        let gateway = Gateway::new();
        gateway.apply(&mut vars, "panel.brightness", &json!(0.8));
        gateway.apply(&mut vars, "panel.visible", &json!(true));
        assert_eq!(vars.float("panel.brightness").unwrap(), 0.8);
        assert!(vars.flag("panel.visible").unwrap());
    }

    #[test]
    fn rejected_key_leaves_variable_unchanged() {
        let mut vars = plant_store();
        let result = Gateway::new().apply(&mut vars, "generator1.value", &json!("lots"));
        assert!(matches!(result, ApplyResult::Rejected { .. }));
        assert_eq!(vars.int("generator1.value").unwrap(), 5);
    }

    #[test]
    fn batch_reports_applied_and_rejected() {
        let mut vars = plant_store();
        let sink = RecordingSink::default();
        let mut patch = IndexMap::new();
        patch.insert("generator1.value".to_string(), json!("3"));
        patch.insert("generator1.active".to_string(), json!("no"));
        patch.insert("generator1.temp".to_string(), json!("hot"));

        let report = Gateway::new().apply_batch(&mut vars, &patch, &sink);
        assert_eq!(
            report.applied,
            ["generator1.value", "generator1.active", "generator1.value"]
        );
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, "generator1.temp");
        assert_eq!(
            sink.rejections.lock().unwrap().as_slice(),
            ["generator1.temp"]
        );
        assert_eq!(vars.int("generator1.value").unwrap(), 0);
    }

    #[test]
    fn truthy_debug_key_dumps_without_mutating() {
        let mut vars = plant_store();
        let before = vars.snapshot();
        let sink = RecordingSink::default();
        let mut patch = IndexMap::new();
        patch.insert(DEBUG_DUMP_KEY.to_string(), json!("1"));

        let report = Gateway::new().apply_batch(&mut vars, &patch, &sink);
        assert_eq!(report.applied, [DEBUG_DUMP_KEY]);
        assert_eq!(sink.dumps.lock().unwrap().as_slice(), [before.len()]);
        assert_eq!(vars.snapshot(), before);
        assert!(!vars.contains(DEBUG_DUMP_KEY));
    }

    #[test]
    fn falsy_debug_key_is_silent() {
        let mut vars = plant_store();
        let sink = RecordingSink::default();
        let mut patch = IndexMap::new();
        patch.insert(DEBUG_DUMP_KEY.to_string(), json!(false));

        Gateway::new().apply_batch(&mut vars, &patch, &sink);
        assert!(sink.dumps.lock().unwrap().is_empty());
    }

    proptest::proptest! {
        #[test]
        fn numeric_patches_always_land_within_the_clamp(v in -1000i64..1000) {
            let mut vars = plant_store();
            Gateway::new().apply(&mut vars, "generator1.value", &json!(v));
            let value = vars.int("generator1.value").unwrap();
            proptest::prop_assert!((0..=10).contains(&value));
        }

        #[test]
        fn battery_cap_holds_for_any_write(v in 0i64..1_000_000) {
            let mut vars = plant_store();
            Gateway::new().apply(&mut vars, "akku1.value", &json!(v));
            let charge = vars.int("akku1.value").unwrap();
            proptest::prop_assert!(charge <= 10_000);
        }
    }

    #[test]
    fn apply_is_idempotent_for_same_raw() {
        let mut vars = plant_store();
        let gateway = Gateway::new();
        gateway.apply(&mut vars, "generator1.temp", &json!("25.5"));
        let once = vars.snapshot();
        gateway.apply(&mut vars, "generator1.temp", &json!("25.5"));
        assert_eq!(vars.snapshot(), once);
    }
}
