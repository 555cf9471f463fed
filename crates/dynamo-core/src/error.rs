//! Error types for the Dynamo plant simulator.
//!
//! Organized by subsystem: coercion (external writes entering the
//! store) and variable access (the engine reading and writing typed
//! variables).

use std::error::Error;
use std::fmt;

use crate::value::ValueKind;

/// A raw patch value could not be converted to a variable's kind.
///
/// Recovered locally by the gateway: the variable is left unchanged
/// and the key is omitted from the applied set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoerceError {
    /// The raw value has no numeric reading for an int or float target.
    NotNumeric {
        /// Rendering of the rejected raw value.
        raw: String,
        /// The kind the value was being coerced to.
        expected: ValueKind,
    },
    /// The raw value has no scalar reading at all (null, array, object,
    /// or free text) and cannot back a new dynamically-typed key.
    UnsupportedRaw {
        /// Rendering of the rejected raw value.
        raw: String,
    },
}

impl CoerceError {
    /// Build a [`CoerceError::NotNumeric`] from a raw JSON value.
    pub fn not_numeric(raw: &serde_json::Value, expected: ValueKind) -> Self {
        Self::NotNumeric {
            raw: raw.to_string(),
            expected,
        }
    }

    /// Build a [`CoerceError::UnsupportedRaw`] from a raw JSON value.
    pub fn unsupported(raw: &serde_json::Value) -> Self {
        Self::UnsupportedRaw {
            raw: raw.to_string(),
        }
    }
}

impl fmt::Display for CoerceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNumeric { raw, expected } => {
                write!(f, "cannot coerce {raw} to {expected}")
            }
            Self::UnsupportedRaw { raw } => {
                write!(f, "raw value {raw} has no scalar reading")
            }
        }
    }
}

impl Error for CoerceError {}

/// A typed variable access failed.
///
/// The engine only produces these when the store has been shaped
/// unexpectedly (a key removed or re-typed out from under a phase);
/// they surface as the tick-level failure the scheduler logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarError {
    /// The key is not defined in the store.
    Missing {
        /// The missing key.
        key: String,
    },
    /// The key exists but holds a different kind.
    KindMismatch {
        /// The accessed key.
        key: String,
        /// The kind the caller asked for.
        expected: ValueKind,
        /// The kind actually stored.
        found: ValueKind,
    },
}

impl fmt::Display for VarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "variable '{key}' is not defined"),
            Self::KindMismatch {
                key,
                expected,
                found,
            } => {
                write!(f, "variable '{key}' is {found}, expected {expected}")
            }
        }
    }
}

impl Error for VarError {}
