//! The variable store and its single-mutex shared wrapper.
//!
//! [`VarStore`] owns no simulation logic: it is a flat, insertion-
//! ordered map from dotted keys to typed values with optional clamp
//! policies. A variable's kind is fixed when it is defined and never
//! changes for the life of the key.
//!
//! [`SharedStore`] is the only shared mutable resource in the plant.
//! One mutex serializes every tick, snapshot read, and patch apply;
//! callers only ever receive full-map copies or single coerced writes,
//! never live references across operations.

use std::sync::{Arc, Mutex, MutexGuard};

use indexmap::IndexMap;

use dynamo_core::{Clamp, Snapshot, Value, ValueKind, VarError};

// ── VarStore ─────────────────────────────────────────────────────

struct Variable {
    value: Value,
    clamp: Option<Clamp>,
}

/// Flat, dynamically-typed mapping from dotted keys to scalar values.
#[derive(Default)]
pub struct VarStore {
    vars: IndexMap<String, Variable>,
}

impl VarStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a variable with an initial value and optional clamp.
    ///
    /// Called once per key at construction time. Redefining a key
    /// replaces its value, kind, and clamp.
    pub fn define(&mut self, key: &str, value: Value, clamp: Option<Clamp>) {
        self.vars.insert(key.to_string(), Variable { value, clamp });
    }

    /// Insert a dynamically-typed key with no clamp.
    ///
    /// The escape hatch for UI-only quantities: the engine never reads
    /// keys inserted this way.
    pub fn insert_dynamic(&mut self, key: &str, value: Value) {
        self.vars.insert(key.to_string(), Variable { value, clamp: None });
    }

    /// Whether a key is defined.
    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    /// The current value of a key, if defined.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.vars.get(key).map(|v| v.value)
    }

    /// The fixed kind of a key, if defined.
    pub fn kind(&self, key: &str) -> Option<ValueKind> {
        self.vars.get(key).map(|v| v.value.kind())
    }

    /// The clamp policy of a key, if defined and clamped.
    pub fn clamp_of(&self, key: &str) -> Option<Clamp> {
        self.vars.get(key).and_then(|v| v.clamp)
    }

    /// Number of defined variables.
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the store holds no variables.
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// An independent copy of every key/value pair.
    pub fn snapshot(&self) -> Snapshot {
        self.vars
            .iter()
            .map(|(k, v)| (k.clone(), v.value))
            .collect()
    }

    /// Write a pre-typed value, bypassing coercion and clamping.
    ///
    /// The engine-only write path: the kind must match the variable's
    /// fixed kind exactly.
    pub fn set_raw(&mut self, key: &str, value: Value) -> Result<(), VarError> {
        let var = self.vars.get_mut(key).ok_or_else(|| VarError::Missing {
            key: key.to_string(),
        })?;
        if var.value.kind() != value.kind() {
            return Err(VarError::KindMismatch {
                key: key.to_string(),
                expected: var.value.kind(),
                found: value.kind(),
            });
        }
        var.value = value;
        Ok(())
    }

    /// Overwrite a key's value without a kind check.
    ///
    /// Gateway-internal: used after coercion, where the kind already
    /// matches by construction.
    pub(crate) fn put(&mut self, key: &str, value: Value) {
        if let Some(var) = self.vars.get_mut(key) {
            var.value = value;
        }
    }

    // ── Typed accessors (engine read/write path) ─────────────────

    /// Read a boolean variable.
    pub fn flag(&self, key: &str) -> Result<bool, VarError> {
        self.typed(key, ValueKind::Bool)?.as_bool().ok_or_else(|| {
            unreachable_kind(key)
        })
    }

    /// Read an integer variable.
    pub fn int(&self, key: &str) -> Result<i64, VarError> {
        self.typed(key, ValueKind::Int)?
            .as_int()
            .ok_or_else(|| unreachable_kind(key))
    }

    /// Read a floating-point variable.
    pub fn float(&self, key: &str) -> Result<f64, VarError> {
        self.typed(key, ValueKind::Float)?
            .as_float()
            .ok_or_else(|| unreachable_kind(key))
    }

    /// Write a boolean variable.
    pub fn set_flag(&mut self, key: &str, value: bool) -> Result<(), VarError> {
        self.set_raw(key, Value::Bool(value))
    }

    /// Write an integer variable.
    pub fn set_int(&mut self, key: &str, value: i64) -> Result<(), VarError> {
        self.set_raw(key, Value::Int(value))
    }

    /// Write a floating-point variable.
    pub fn set_float(&mut self, key: &str, value: f64) -> Result<(), VarError> {
        self.set_raw(key, Value::Float(value))
    }

    fn typed(&self, key: &str, kind: ValueKind) -> Result<Value, VarError> {
        let value = self.get(key).ok_or_else(|| VarError::Missing {
            key: key.to_string(),
        })?;
        if value.kind() != kind {
            return Err(VarError::KindMismatch {
                key: key.to_string(),
                expected: kind,
                found: value.kind(),
            });
        }
        Ok(value)
    }
}

fn unreachable_kind(key: &str) -> VarError {
    // typed() already verified the kind; keep a real error anyway so
    // the accessor stays total.
    VarError::Missing {
        key: key.to_string(),
    }
}

// ── SharedStore ──────────────────────────────────────────────────

/// The mutex-protected store shared between the tick worker and
/// external callers.
///
/// Cloning is cheap (an `Arc` bump) and every clone refers to the same
/// underlying store.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<VarStore>>,
}

impl SharedStore {
    /// Wrap a populated store.
    pub fn new(store: VarStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    /// Acquire the store lock for the duration of one operation.
    ///
    /// A panicking holder must not wedge the plant, so poisoning is
    /// recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, VarStore> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// An atomic, independent copy of every key/value pair.
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot()
    }
}
