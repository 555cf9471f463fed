//! Dynamo: a deterministic tick-based energy-plant simulator.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the Dynamo sub-crates. For most users, adding `dynamo` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use dynamo::prelude::*;
//! use std::time::Duration;
//!
//! // Start the reference plant with a fast tick for the example.
//! let config = PlantConfig {
//!     tick_period: Duration::from_millis(10),
//!     seed: 42,
//!     ..PlantConfig::default()
//! };
//! let mut plant = Plant::new(config).unwrap();
//!
//! // Patch a variable: raw values are coerced to the store's types.
//! let mut patch = indexmap::IndexMap::new();
//! patch.insert("generator1.value".to_string(), serde_json::json!("7"));
//! let result = plant.apply_patch(&patch);
//! assert_eq!(result.applied, ["generator1.value"]);
//! assert_eq!(result.snapshot["generator1.value"], Value::Int(7));
//!
//! let report = plant.shutdown();
//! assert!(report.worker_joined);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `dynamo-core` | `Value`, clamps, keys, errors, the status sink |
//! | [`store`] | `dynamo-store` | Variable store, shared mutex wrapper, gateway |
//! | [`engine`] | `dynamo-engine` | Phases, tick engine, plant lifecycle |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and errors (`dynamo-core`).
///
/// The scalar [`types::Value`], [`types::Clamp`] constraints, dotted-key
/// helpers, and the [`types::StatusSink`] observability seam.
pub use dynamo_core as types;

/// Variable store and mutation gateway (`dynamo-store`).
///
/// [`store::VarStore`] holds the plant variables; [`store::Gateway`]
/// validates external writes.
pub use dynamo_store as store;

/// Tick engine and plant lifecycle (`dynamo-engine`).
///
/// [`engine::Plant`] is the main entry point; [`engine::Phase`] is the
/// extension seam for custom pipelines.
pub use dynamo_engine as engine;

/// Common imports for typical Dynamo usage.
///
/// ```rust
/// use dynamo::prelude::*;
/// ```
pub mod prelude {
    // Core values and observability
    pub use dynamo_core::{
        Clamp, LogSink, NullSink, Snapshot, StatusSink, TickId, Value, ValueKind,
    };

    // Errors
    pub use dynamo_core::{CoerceError, VarError};
    pub use dynamo_engine::{ConfigError, PhaseError, TickError};

    // Store and gateway
    pub use dynamo_store::{Gateway, SharedStore, VarStore};

    // Engine and plant
    pub use dynamo_engine::{
        PatchResult, Phase, PhaseContext, Plant, PlantConfig, ShutdownReport, TickEngine,
        TickMetrics,
    };
}
