//! Tick engine, reference phases, and plant lifecycle.
//!
//! The engine runs an ordered pipeline of [`Phase`]s against the
//! shared variable store, one lock acquisition per tick, driven by a
//! background worker at a fixed cadence. [`Plant`] ties it together:
//! construction, snapshots, validated patches, and bounded shutdown.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod layout;
pub mod metrics;
pub mod phase;
pub mod phases;
pub mod plant;
pub mod tick;

mod worker;

pub use config::{ConfigError, PlantConfig};
pub use metrics::TickMetrics;
pub use phase::{Phase, PhaseContext, PhaseError};
pub use plant::{PatchResult, Plant, ShutdownReport};
pub use tick::{TickEngine, TickError};
