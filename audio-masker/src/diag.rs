//! Shared diagnostic counters.
//!
//! [`PipelineStats`] is the drop-and-count side of the error policy: the
//! ISR may never raise an error that needs unbounded-time handling, so
//! every interrupt-context fault reduces to an atomic counter increment.
//! The worker context reports the same counters through the `log` facade
//! and external telemetry polls them via [`snapshot()`](PipelineStats::snapshot).

use core::sync::atomic::{AtomicU32, Ordering};

/// Atomic event counters shared by the ISR and worker contexts.
pub struct PipelineStats {
    dispatches: AtomicU32,
    dispatches_dropped: AtomicU32,
    blocks_processed: AtomicU32,
    deadline_misses: AtomicU32,
}

/// A point-in-time copy of [`PipelineStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    /// Dispatch events successfully enqueued by the ISR.
    pub dispatches: u32,
    /// Dispatch events dropped because the queue was full.
    pub dispatches_dropped: u32,
    /// Blocks processed by the worker context.
    pub blocks_processed: u32,
    /// Blocks whose processing overran one block period.
    pub deadline_misses: u32,
}

impl PipelineStats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        PipelineStats {
            dispatches: AtomicU32::new(0),
            dispatches_dropped: AtomicU32::new(0),
            blocks_processed: AtomicU32::new(0),
            deadline_misses: AtomicU32::new(0),
        }
    }

    /// Count a successful dispatch enqueue (ISR context).
    pub fn record_dispatch(&self) {
        self.dispatches.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dropped dispatch (ISR context, queue full).
    pub fn record_dispatch_dropped(&self) {
        self.dispatches_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a processed block (worker context).
    pub fn record_block_processed(&self) {
        self.blocks_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a real-time deadline miss (worker context).
    pub fn record_deadline_miss(&self) {
        self.deadline_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Dispatch events dropped so far.
    pub fn dispatches_dropped(&self) -> u32 {
        self.dispatches_dropped.load(Ordering::Relaxed)
    }

    /// Deadline misses so far.
    pub fn deadline_misses(&self) -> u32 {
        self.deadline_misses.load(Ordering::Relaxed)
    }

    /// Copy all counters.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            dispatches: self.dispatches.load(Ordering::Relaxed),
            dispatches_dropped: self.dispatches_dropped.load(Ordering::Relaxed),
            blocks_processed: self.blocks_processed.load(Ordering::Relaxed),
            deadline_misses: self.deadline_misses.load(Ordering::Relaxed),
        }
    }
}

impl Default for PipelineStats {
    fn default() -> Self {
        Self::new()
    }
}
