//! The plant: construction, external operations, and shutdown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use indexmap::IndexMap;

use dynamo_core::{LogSink, Snapshot, StatusSink};
use dynamo_store::{Gateway, SharedStore};

use crate::config::{ConfigError, PlantConfig};
use crate::layout;
use crate::tick::TickEngine;
use crate::worker::TickWorkerState;

/// Result of one patch application.
#[derive(Debug)]
pub struct PatchResult {
    /// Every key mutated, cascade targets included. Empty on a
    /// non-empty patch means the whole patch was rejected.
    pub applied: Vec<String>,
    /// The full store state after the patch.
    pub snapshot: Snapshot,
}

/// Report from the bounded shutdown sequence.
#[derive(Debug)]
pub struct ShutdownReport {
    /// Wall time of the whole sequence.
    pub total_ms: u64,
    /// Whether the worker acknowledged the stop within the budget.
    pub acknowledged: bool,
    /// Whether the worker thread was joined.
    pub worker_joined: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Running,
    Stopped,
}

/// A running simulated plant.
///
/// Construction seeds the reference layout and spawns the tick worker;
/// the handle then exposes exactly three operations: `snapshot`,
/// `apply_patch`, and `static_structure`. All of them interleave with
/// the tick loop through the single store mutex, so a snapshot is
/// always a tick boundary, never a half-updated plant.
pub struct Plant {
    store: SharedStore,
    gateway: Gateway,
    sink: Arc<dyn StatusSink>,
    structure: Option<serde_json::Value>,
    shutdown_flag: Arc<AtomicBool>,
    done_rx: Receiver<()>,
    worker: Option<JoinHandle<TickEngine>>,
    join_timeout: Duration,
    state: Lifecycle,
}

impl Plant {
    /// Validate `config`, build the reference plant, and start ticking.
    pub fn new(config: PlantConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let store = SharedStore::new(layout::initial_store());
        let sink: Arc<dyn StatusSink> = config.sink.unwrap_or_else(|| Arc::new(LogSink));
        let engine = TickEngine::new(store.clone(), layout::default_phases(), config.seed);

        let shutdown_flag = Arc::new(AtomicBool::new(false));
        let (done_tx, done_rx) = crossbeam_channel::bounded(1);

        let worker_state = TickWorkerState {
            engine,
            period: config.tick_period,
            shutdown: Arc::clone(&shutdown_flag),
            sink: Arc::clone(&sink),
            done_tx,
        };
        let worker = thread::Builder::new()
            .name("dynamo-tick".into())
            .spawn(move || worker_state.run())
            .map_err(|e| ConfigError::ThreadSpawnFailed {
                reason: e.to_string(),
            })?;

        Ok(Self {
            store,
            gateway: Gateway::new(),
            sink,
            structure: config.structure,
            shutdown_flag,
            done_rx,
            worker: Some(worker),
            join_timeout: config.join_timeout,
            state: Lifecycle::Running,
        })
    }

    /// An atomic copy of every plant variable.
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Apply a raw patch map and return the applied keys plus the
    /// post-patch state, all under one lock acquisition.
    pub fn apply_patch(&self, patch: &IndexMap<String, serde_json::Value>) -> PatchResult {
        let mut vars = self.store.lock();
        let report = self.gateway.apply_batch(&mut vars, patch, self.sink.as_ref());
        PatchResult {
            applied: report.applied,
            snapshot: vars.snapshot(),
        }
    }

    /// The opaque structure blob given at construction, if any.
    ///
    /// Served verbatim for frontends; the simulation never reads it.
    pub fn static_structure(&self) -> Option<&serde_json::Value> {
        self.structure.as_ref()
    }

    /// Stop the tick worker with a bounded join.
    ///
    /// Sets the flag, wakes the worker out of its budget sleep, waits
    /// up to the configured join timeout for its acknowledgement, and
    /// joins it. A worker that never acknowledges is abandoned rather
    /// than waited on forever. Idempotent.
    pub fn shutdown(&mut self) -> ShutdownReport {
        if self.state == Lifecycle::Stopped {
            return ShutdownReport {
                total_ms: 0,
                acknowledged: true,
                worker_joined: true,
            };
        }
        self.state = Lifecycle::Stopped;

        let started = Instant::now();
        self.shutdown_flag.store(true, Ordering::Release);
        if let Some(handle) = &self.worker {
            handle.thread().unpark();
        }

        let acknowledged = self.done_rx.recv_timeout(self.join_timeout).is_ok();

        let worker_joined = if acknowledged {
            self.worker
                .take()
                .map(|handle| handle.join().is_ok())
                .unwrap_or(true)
        } else {
            // Leak the handle: joining an unresponsive worker could
            // block past the budget.
            self.worker.take();
            false
        };

        ShutdownReport {
            total_ms: started.elapsed().as_millis() as u64,
            acknowledged,
            worker_joined,
        }
    }
}

impl Drop for Plant {
    fn drop(&mut self) {
        if self.state == Lifecycle::Running {
            self.shutdown();
        }
    }
}
