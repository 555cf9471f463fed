//! Scalar variable values, JSON coercion, and clamp constraints.
//!
//! Every plant variable is a [`Value`]: a tagged scalar whose kind
//! (boolean, integer, or floating-point) is fixed when the variable is
//! defined and never changes afterwards. External writes arrive as raw
//! [`serde_json::Value`]s and are coerced to the target kind with the
//! rules in [`Value::coerce_json`]; the engine writes pre-typed values
//! and never coerces.

use std::fmt;

use serde::Serialize;

use crate::error::CoerceError;

/// A full, point-in-time copy of the variable store.
///
/// Insertion-ordered so snapshots serialize in definition order, the
/// same flat JSON map the transport layer exposes.
pub type Snapshot = indexmap::IndexMap<String, Value>;

// ── Value ────────────────────────────────────────────────────────

/// A scalar plant variable value.
///
/// Serializes untagged, so a [`Snapshot`] becomes a plain JSON object
/// of booleans and numbers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A boolean flag, e.g. `generator1.active`.
    Bool(bool),
    /// An integer quantity, e.g. `akku1.value`.
    Int(i64),
    /// A floating-point quantity, e.g. `generator1.temp`.
    Float(f64),
}

/// The kind of a [`Value`], fixed at variable definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Boolean.
    Bool,
    /// Integer.
    Int,
    /// Floating-point.
    Float,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "bool"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
        }
    }
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
        }
    }

    /// The boolean payload, if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if this is a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The float payload, if this is a [`Value::Float`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Coerce a raw JSON value to `kind`.
    ///
    /// Boolean targets never fail: the stringified raw is matched
    /// case-insensitively against the truthy token set
    /// {"true", "1", "yes"} and anything else is `false`. Numeric
    /// targets accept JSON numbers (floats truncate toward zero for
    /// integer targets), JSON bools (1/0), and numeric strings.
    pub fn coerce_json(raw: &serde_json::Value, kind: ValueKind) -> Result<Value, CoerceError> {
        match kind {
            ValueKind::Bool => Ok(Value::Bool(json_is_truthy(raw))),
            ValueKind::Int => match raw {
                serde_json::Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
                serde_json::Value::Number(n) => {
                    if let Some(i) = n.as_i64() {
                        Ok(Value::Int(i))
                    } else if let Some(f) = n.as_f64() {
                        Ok(Value::Int(f as i64))
                    } else {
                        Err(CoerceError::not_numeric(raw, kind))
                    }
                }
                serde_json::Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map(Value::Int)
                    .map_err(|_| CoerceError::not_numeric(raw, kind)),
                _ => Err(CoerceError::not_numeric(raw, kind)),
            },
            ValueKind::Float => match raw {
                serde_json::Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
                serde_json::Value::Number(n) => n
                    .as_f64()
                    .map(Value::Float)
                    .ok_or_else(|| CoerceError::not_numeric(raw, kind)),
                serde_json::Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map(Value::Float)
                    .map_err(|_| CoerceError::not_numeric(raw, kind)),
                _ => Err(CoerceError::not_numeric(raw, kind)),
            },
        }
    }

    /// Infer a value from a raw JSON value's natural type.
    ///
    /// Used when an unknown key is inserted into the store: JSON bools
    /// stay bools, integral numbers become integers, other numbers
    /// become floats. Strings are accepted when they read as a boolean
    /// token or a number. Raw values with no scalar reading (null,
    /// arrays, objects, free text) are rejected.
    pub fn from_json(raw: &serde_json::Value) -> Result<Value, CoerceError> {
        match raw {
            serde_json::Value::Bool(b) => Ok(Value::Bool(*b)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Value::Int(i))
                } else {
                    n.as_f64()
                        .map(Value::Float)
                        .ok_or_else(|| CoerceError::unsupported(raw))
                }
            }
            serde_json::Value::String(s) => {
                let token = s.trim();
                match token.to_ascii_lowercase().as_str() {
                    "true" | "yes" => return Ok(Value::Bool(true)),
                    "false" | "no" => return Ok(Value::Bool(false)),
                    _ => {}
                }
                if let Ok(i) = token.parse::<i64>() {
                    Ok(Value::Int(i))
                } else if let Ok(f) = token.parse::<f64>() {
                    Ok(Value::Float(f))
                } else {
                    Err(CoerceError::unsupported(raw))
                }
            }
            _ => Err(CoerceError::unsupported(raw)),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}

/// Whether a raw JSON value reads as truthy.
///
/// Mirrors the store's boolean coercion: the stringified raw is
/// matched case-insensitively against {"true", "1", "yes"}. Note that
/// the float `1.0` stringifies to `"1.0"` and is therefore falsy.
pub fn json_is_truthy(raw: &serde_json::Value) -> bool {
    let token = match raw {
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s.clone(),
        _ => return false,
    };
    matches!(token.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

// ── Clamp ────────────────────────────────────────────────────────

/// An optional min/max bound applied after external writes.
///
/// Bounds are expressed as floats and apply to both integer and
/// floating-point variables; booleans pass through unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clamp {
    /// Lower bound, inclusive.
    pub min: Option<f64>,
    /// Upper bound, inclusive.
    pub max: Option<f64>,
}

impl Clamp {
    /// A clamp with both bounds.
    pub fn range(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    /// A clamp with only a lower bound.
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    /// Apply the clamp to a value, returning the bounded result.
    pub fn apply(&self, value: Value) -> Value {
        match value {
            Value::Bool(_) => value,
            Value::Int(i) => {
                let mut v = i;
                if let Some(min) = self.min {
                    v = v.max(min.ceil() as i64);
                }
                if let Some(max) = self.max {
                    v = v.min(max.floor() as i64);
                }
                Value::Int(v)
            }
            Value::Float(f) => {
                let mut v = f;
                if let Some(min) = self.min {
                    v = v.max(min);
                }
                if let Some(max) = self.max {
                    v = v.min(max);
                }
                Value::Float(v)
            }
        }
    }
}
