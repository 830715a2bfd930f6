//! Worker-context block processing.
//!
//! The [`Worker`] owns the active algorithm variant and is the sole
//! consumer of the dispatch queue. It resolves each event into the block
//! views the cursor-offset invariant guarantees it exclusive access to,
//! runs [`Algorithm::process`], and then performs the deadline check: if
//! more than one block of ticks elapsed since dispatch, the output cursor
//! entered the region while it was being written and the block is
//! reported as a real-time deadline miss.
//!
//! The worker is the only context that suspends, and only inside the
//! `park` hook of [`run()`](Worker::run) — `wfi` under RTIC, a thread
//! yield on a host.

use log::{debug, info, warn};

use crate::algorithm::{Algorithm, Diagnostics, Variant};
use crate::buffer::BufferPair;
use crate::config::{ConfigError, PipelineConfig};
use crate::diag::PipelineStats;
use crate::dispatch::{DispatchEvent, DispatchQueue};

/// Result of processing one dispatched block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockOutcome {
    /// The event that was consumed.
    pub event: DispatchEvent,
    /// Whether processing overran the one-block-period deadline.
    pub deadline_missed: bool,
}

/// The deferred execution context of the pipeline.
pub struct Worker<'a, const C: usize, const B: usize, const N: usize> {
    buffers: &'a BufferPair<C, B>,
    queue: &'a DispatchQueue<N>,
    stats: &'a PipelineStats,
    algorithm: Variant<B>,
    /// Drop count already reported through the log, to report each drop once.
    reported_drops: u32,
}

impl<'a, const C: usize, const B: usize, const N: usize> Worker<'a, C, B, N> {
    /// Validate the configuration and build the selected algorithm.
    ///
    /// Fatal on any configuration fault — the pipeline must not start.
    pub fn new(
        buffers: &'a BufferPair<C, B>,
        queue: &'a DispatchQueue<N>,
        stats: &'a PipelineStats,
        config: &PipelineConfig,
    ) -> Result<Self, ConfigError> {
        config.validate::<C, B>()?;
        let algorithm = Variant::build(config)?;
        info!(
            "pipeline worker up: capacity={C} block={B} rate={}Hz algorithm={:?}",
            config.sample_rate_hz,
            algorithm.kind()
        );
        Ok(Worker {
            buffers,
            queue,
            stats,
            algorithm,
            reported_drops: 0,
        })
    }

    /// Process one dispatched block, if any is pending.
    pub fn try_process_one(&mut self) -> Option<BlockOutcome> {
        let event = self.queue.try_dequeue()?;

        // SAFETY: `event` came from the single-consumer queue, so these
        // are the block ranges the ISR partitioned off for us; the borrows
        // end inside this call, within the deadline window checked below.
        let (input, output) = unsafe {
            (
                self.buffers.input_block(event.input_pos),
                self.buffers.output_block_mut(event.output_pos),
            )
        };
        self.algorithm.process(input, output);

        let elapsed = self.buffers.ticks().wrapping_sub(event.tick);
        let deadline_missed = elapsed > B as u32;

        self.stats.record_block_processed();
        if deadline_missed {
            self.stats.record_deadline_miss();
            warn!(
                "deadline miss: block at {} finished {elapsed} ticks after dispatch (budget {B})",
                event.output_pos
            );
        } else {
            debug!(
                "processed block input={} output={} in {elapsed} ticks",
                event.input_pos, event.output_pos
            );
        }

        let drops = self.stats.dispatches_dropped();
        if drops != self.reported_drops {
            warn!(
                "dispatch queue overflow: {} block(s) dropped",
                drops.wrapping_sub(self.reported_drops)
            );
            self.reported_drops = drops;
        }

        Some(BlockOutcome {
            event,
            deadline_missed,
        })
    }

    /// Worker loop: drain the queue, then suspend in `park`.
    ///
    /// `park` is the worker's sole suspension point; it returns `false`
    /// to stop the loop.
    pub fn run<P: FnMut() -> bool>(&mut self, mut park: P) {
        loop {
            while self.try_process_one().is_some() {}
            if !park() {
                return;
            }
        }
    }

    /// Replace the active algorithm.
    ///
    /// The `&mut self` receiver guarantees no `process` call is in flight;
    /// the old variant is dropped (`deinit`) before the new one is built.
    pub fn switch_algorithm(&mut self, config: &PipelineConfig) -> Result<(), ConfigError> {
        config.validate::<C, B>()?;
        self.algorithm = Variant::build(config)?;
        info!("algorithm switched to {:?}", self.algorithm.kind());
        Ok(())
    }

    /// Diagnostic scalars of the active variant, for external telemetry.
    pub fn diagnostics(&self) -> Option<Diagnostics> {
        self.algorithm.diagnostics()
    }
}
