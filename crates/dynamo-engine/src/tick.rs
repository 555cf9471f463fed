//! Ordered phase execution under one lock acquisition per tick.

use std::error::Error;
use std::fmt;
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use dynamo_core::TickId;
use dynamo_store::SharedStore;

use crate::metrics::TickMetrics;
use crate::phase::{Phase, PhaseContext, PhaseError};

/// A phase failed mid-tick.
///
/// The remaining phases of that tick are skipped and earlier writes
/// stand; the tick counter has already advanced, so the next tick
/// starts clean.
#[derive(Debug)]
pub struct TickError {
    /// The tick that failed.
    pub tick: TickId,
    /// Name of the failing phase.
    pub phase: String,
    /// The underlying phase failure.
    pub source: PhaseError,
}

impl fmt::Display for TickError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tick {} aborted in phase '{}': {}",
            self.tick, self.phase, self.source
        )
    }
}

impl Error for TickError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Executes the phase pipeline against the shared store.
///
/// Owns the pipeline and the seeded RNG; the store lock is taken once
/// per tick, so external snapshots and patches interleave between
/// ticks, never inside one.
pub struct TickEngine {
    store: SharedStore,
    phases: Vec<Box<dyn Phase>>,
    rng: ChaCha8Rng,
    current: TickId,
    last_metrics: Option<TickMetrics>,
}

impl TickEngine {
    /// Build an engine over `store` running `phases` in order.
    pub fn new(store: SharedStore, phases: Vec<Box<dyn Phase>>, seed: u64) -> Self {
        Self {
            store,
            phases,
            rng: ChaCha8Rng::seed_from_u64(seed),
            current: TickId(0),
            last_metrics: None,
        }
    }

    /// The identifier of the most recently started tick.
    pub fn current_tick(&self) -> TickId {
        self.current
    }

    /// The store this engine ticks against.
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Timing of the most recent successful tick.
    pub fn last_metrics(&self) -> Option<&TickMetrics> {
        self.last_metrics.as_ref()
    }

    /// Run every phase once, in order, under a single lock acquisition.
    ///
    /// The tick counter advances whether or not the tick completes;
    /// a failed tick is reported, not retried.
    pub fn execute_tick(&mut self) -> Result<TickMetrics, TickError> {
        let tick = self.current.next();
        self.current = tick;

        let started = Instant::now();
        let mut vars = self.store.lock();
        let mut phase_us = Vec::with_capacity(self.phases.len());

        for phase in &mut self.phases {
            let phase_started = Instant::now();
            let mut ctx = PhaseContext {
                vars: &mut vars,
                rng: &mut self.rng,
                tick,
            };
            if let Err(source) = phase.step(&mut ctx) {
                return Err(TickError {
                    tick,
                    phase: phase.name().to_string(),
                    source,
                });
            }
            phase_us.push((
                phase.name().to_string(),
                phase_started.elapsed().as_micros() as u64,
            ));
        }
        drop(vars);

        let metrics = TickMetrics {
            tick,
            total_us: started.elapsed().as_micros() as u64,
            phase_us,
        };
        self.last_metrics = Some(metrics.clone());
        Ok(metrics)
    }
}
