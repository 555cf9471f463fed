//! Thread-safe variable store and mutation gateway.
//!
//! [`VarStore`] is the flat map of dotted-key plant variables;
//! [`SharedStore`] wraps it in the single mutex that serializes ticks,
//! snapshot reads, and external patches. [`Gateway`] validates and
//! applies external writes: type coercion, per-key clamps, cascade
//! rules, and the reserved diagnostic key.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod gateway;
pub mod store;

pub use gateway::{ApplyResult, Gateway, PatchReport};
pub use store::{SharedStore, VarStore};
