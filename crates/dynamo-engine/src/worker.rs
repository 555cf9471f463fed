//! Background tick loop at a fixed cadence.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::Sender;

use dynamo_core::StatusSink;

use crate::tick::TickEngine;

/// State owned by the tick worker thread.
///
/// The engine is moved in and handed back through the `JoinHandle`
/// when the loop exits. Budget sleeps use `park_timeout` so a
/// shutdown `unpark()` wakes the worker immediately even with a long
/// tick period.
pub(crate) struct TickWorkerState {
    pub(crate) engine: TickEngine,
    pub(crate) period: Duration,
    pub(crate) shutdown: Arc<AtomicBool>,
    pub(crate) sink: Arc<dyn StatusSink>,
    pub(crate) done_tx: Sender<()>,
}

impl TickWorkerState {
    /// Run ticks until the shutdown flag is set.
    ///
    /// A tick that overruns its budget starts the next one
    /// immediately; there is no catch-up for lost cadence. Failed
    /// ticks are reported to the sink and the loop keeps going.
    pub(crate) fn run(mut self) -> TickEngine {
        loop {
            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            let started = Instant::now();
            match self.engine.execute_tick() {
                Ok(metrics) => {
                    tracing::trace!(tick = %metrics.tick, total_us = metrics.total_us, "tick");
                }
                Err(err) => {
                    self.sink.tick_failed(err.tick, &err.to_string());
                }
            }

            if let Some(remaining) = self.period.checked_sub(started.elapsed()) {
                thread::park_timeout(remaining);
            }
        }

        // Best-effort: the plant may already have given up waiting.
        let _ = self.done_tx.send(());
        self.engine
    }
}
