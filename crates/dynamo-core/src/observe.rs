//! Operator-facing observability sink.
//!
//! The simulation never writes to the console directly. Everything an
//! operator might care about — snapshot dumps, failed ticks, rejected
//! patch keys — flows through a [`StatusSink`] chosen at construction
//! time. The default [`LogSink`] emits `tracing` events; tests plug in
//! [`NullSink`] or a recording sink.

use crate::value::Snapshot;
use crate::TickId;

/// Destination for operator-facing status events.
pub trait StatusSink: Send + Sync {
    /// A full snapshot dump was requested via the diagnostic key.
    fn status_dump(&self, snapshot: &Snapshot);

    /// A tick aborted with an error; the simulation continues.
    fn tick_failed(&self, tick: TickId, reason: &str);

    /// A patch key was rejected by the gateway.
    fn patch_rejected(&self, key: &str, reason: &str);
}

/// Sink that emits `tracing` events at sensible levels.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl StatusSink for LogSink {
    fn status_dump(&self, snapshot: &Snapshot) {
        tracing::info!(variables = snapshot.len(), "plant status dump");
        for (key, value) in snapshot {
            tracing::info!(%key, %value, "status");
        }
    }

    fn tick_failed(&self, tick: TickId, reason: &str) {
        tracing::error!(%tick, reason, "tick aborted");
    }

    fn patch_rejected(&self, key: &str, reason: &str) {
        tracing::warn!(key, reason, "patch key rejected");
    }
}

/// Sink that discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl StatusSink for NullSink {
    fn status_dump(&self, _snapshot: &Snapshot) {}
    fn tick_failed(&self, _tick: TickId, _reason: &str) {}
    fn patch_rejected(&self, _key: &str, _reason: &str) {}
}
