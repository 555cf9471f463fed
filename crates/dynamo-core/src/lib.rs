//! Core types for the Dynamo plant simulator.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the scalar [`Value`] type and its coercion rules, [`Clamp`]
//! constraints, dotted-key conventions, tick identifiers, error types,
//! and the [`StatusSink`] observability seam.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod key;
pub mod observe;
pub mod value;

pub use error::{CoerceError, VarError};
pub use key::{ComponentKind, DEBUG_DUMP_KEY};
pub use observe::{LogSink, NullSink, StatusSink};
pub use value::{json_is_truthy, Clamp, Snapshot, Value, ValueKind};

use std::fmt;

/// Identifier of one tick of the simulation.
///
/// Ticks are totally ordered: tick N's output is tick N+1's input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickId(pub u64);

impl TickId {
    /// The identifier of the following tick.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
