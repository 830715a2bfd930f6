//! Timer-ISR sampling routine.
//!
//! [`Sampler::tick`] is the only code that runs on every sample tick. It
//! performs a fixed sequence with no allocation, no locks and no retries:
//!
//! 1. On a block boundary, enqueue a [`DispatchEvent`] for the block that
//!    just completed. A full queue drops the event and counts it.
//! 2. Read one sample from the analog source into the input ring.
//! 3. Emit one sample from the output ring to the analog sink.
//! 4. Advance both cursors.
//!
//! Hardware configuration (attenuation, bit width, the timer itself) is
//! the platform's concern; the sampler only sees the two single-sample
//! traits below.
//!
//! ## Usage with a hardware timer
//!
//! ```ignore
//! static BUFFERS: BufferPair<2048, 256> = BufferPair::new();
//! static QUEUE: DispatchQueue<8> = DispatchQueue::new();
//! static STATS: PipelineStats = PipelineStats::new();
//!
//! // In the timer ISR:
//! sampler.tick(&mut adc, &mut dac);
//! ```

use crate::buffer::BufferPair;
use crate::diag::PipelineStats;
use crate::dispatch::{DispatchEvent, DispatchQueue};

/// Single-sample analog input collaborator (e.g. an on-chip ADC channel).
pub trait AnalogSource {
    /// Read one sample. Called once per tick from interrupt context, so
    /// implementations must be bounded-time.
    fn read(&mut self) -> u16;
}

/// Single-sample analog output collaborator (e.g. an on-chip DAC channel).
pub trait AnalogSink {
    /// Write one sample. Called once per tick from interrupt context, so
    /// implementations must be bounded-time.
    fn write(&mut self, sample: u8);
}

/// The per-tick sampling state machine.
///
/// Holds shared references to the buffer pair, dispatch queue and counters
/// so the ISR body is a single [`tick()`](Self::tick) call. Exactly one
/// `Sampler` may exist per pipeline (it is the sole producer for both the
/// buffers and the queue).
pub struct Sampler<'a, const C: usize, const B: usize, const N: usize> {
    buffers: &'a BufferPair<C, B>,
    queue: &'a DispatchQueue<N>,
    stats: &'a PipelineStats,
}

impl<'a, const C: usize, const B: usize, const N: usize> Sampler<'a, C, B, N> {
    /// Create the sampler for a pipeline's shared state.
    pub const fn new(
        buffers: &'a BufferPair<C, B>,
        queue: &'a DispatchQueue<N>,
        stats: &'a PipelineStats,
    ) -> Self {
        Sampler {
            buffers,
            queue,
            stats,
        }
    }

    /// Run one sample tick. Call from the timer interrupt.
    pub fn tick<S: AnalogSource, D: AnalogSink>(&mut self, source: &mut S, sink: &mut D) {
        let input_pos = self.buffers.input_pos();
        let output_pos = self.buffers.output_pos();

        if input_pos % B == 0 {
            // The completed input block sits one block behind the input
            // cursor; the output region is the one the output cursor will
            // enter one block period from now. Both stay clear of every
            // position the ISR touches until then.
            let event = DispatchEvent {
                input_pos: (input_pos + C - B) % C,
                output_pos: input_pos,
                tick: self.buffers.ticks(),
            };
            if self.queue.try_enqueue(event) {
                self.stats.record_dispatch();
            } else {
                // No synchronous retry from interrupt context. The block's
                // output stays stale this cycle and the pipeline continues.
                self.stats.record_dispatch_dropped();
            }
        }

        // SAFETY: sole producer context; `input_pos` is the current input
        // cursor, outside any block range handed to the worker.
        unsafe { self.buffers.store_input(input_pos, source.read()) };

        // SAFETY: sole producer context; `output_pos` is the current output
        // cursor, one block behind the input cursor and outside the
        // worker's write region.
        let sample = unsafe { self.buffers.load_output(output_pos) };
        sink.write(sample);

        self.buffers.advance_input();
        self.buffers.advance_output();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RampSource {
        next: u16,
    }

    impl AnalogSource for RampSource {
        fn read(&mut self) -> u16 {
            let v = self.next;
            self.next = self.next.wrapping_add(1);
            v
        }
    }

    struct CaptureSink {
        last: u8,
        writes: usize,
    }

    impl AnalogSink for CaptureSink {
        fn write(&mut self, sample: u8) {
            self.last = sample;
            self.writes += 1;
        }
    }

    fn fixtures() -> (BufferPair<16, 4>, DispatchQueue<4>, PipelineStats) {
        (BufferPair::new(), DispatchQueue::new(), PipelineStats::new())
    }

    #[test]
    fn tick_samples_emits_and_advances() {
        let (buffers, queue, stats) = fixtures();
        let mut sampler = Sampler::new(&buffers, &queue, &stats);
        let mut source = RampSource { next: 100 };
        let mut sink = CaptureSink { last: 0, writes: 0 };

        sampler.tick(&mut source, &mut sink);

        assert_eq!(unsafe { buffers.input_block(0) }[0], 100);
        assert_eq!(sink.writes, 1);
        assert_eq!(sink.last, 0); // output ring starts zeroed
        assert_eq!(buffers.input_pos(), 1);
        assert_eq!(buffers.output_pos(), 13);
    }

    #[test]
    fn dispatch_only_on_block_boundary() {
        let (buffers, queue, stats) = fixtures();
        let mut sampler = Sampler::new(&buffers, &queue, &stats);
        let mut source = RampSource { next: 0 };
        let mut sink = CaptureSink { last: 0, writes: 0 };

        // Tick 0 is a boundary; ticks 1-3 are not; tick 4 is the next one.
        for _ in 0..4 {
            sampler.tick(&mut source, &mut sink);
        }
        assert_eq!(queue.len(), 1);

        sampler.tick(&mut source, &mut sink);
        assert_eq!(queue.len(), 2);
        assert_eq!(stats.snapshot().dispatches, 2);
    }

    #[test]
    fn event_references_completed_block_and_pending_output() {
        let (buffers, queue, stats) = fixtures();
        let mut sampler = Sampler::new(&buffers, &queue, &stats);
        let mut source = RampSource { next: 0 };
        let mut sink = CaptureSink { last: 0, writes: 0 };

        for _ in 0..5 {
            sampler.tick(&mut source, &mut sink);
        }

        // First boundary (input cursor 0): completed block wraps to 12.
        let first = queue.try_dequeue().unwrap();
        assert_eq!(first.input_pos, 12);
        assert_eq!(first.output_pos, 0);
        assert_eq!(first.tick, 0);

        // Second boundary (input cursor 4): block 0 just completed.
        let second = queue.try_dequeue().unwrap();
        assert_eq!(second.input_pos, 0);
        assert_eq!(second.output_pos, 4);
        assert_eq!(second.tick, 4);
    }

    #[test]
    fn queue_full_drops_are_counted_and_sampling_continues() {
        let (buffers, queue, stats) = fixtures();
        let mut sampler = Sampler::new(&buffers, &queue, &stats);
        let mut source = RampSource { next: 0 };
        let mut sink = CaptureSink { last: 0, writes: 0 };

        // Queue holds 3 events; the worker never drains, so the 4th
        // boundary drops. 16 ticks cross 4 boundaries.
        for _ in 0..16 {
            sampler.tick(&mut source, &mut sink);
        }

        let snap = stats.snapshot();
        assert_eq!(snap.dispatches, 3);
        assert_eq!(snap.dispatches_dropped, 1);
        assert_eq!(sink.writes, 16); // the ISR never stalled
        assert_eq!(buffers.ticks(), 16);
    }

    #[test]
    fn emits_worker_written_output_one_block_later() {
        let (buffers, queue, stats) = fixtures();
        let mut sampler = Sampler::new(&buffers, &queue, &stats);
        let mut source = RampSource { next: 0 };
        let mut sink = CaptureSink { last: 0, writes: 0 };

        sampler.tick(&mut source, &mut sink);
        let event = queue.try_dequeue().unwrap();

        // Worker fills the pending output block.
        let out = unsafe { buffers.output_block_mut(event.output_pos) };
        out.copy_from_slice(&[7, 8, 9, 10]);

        // The output cursor reaches that block after three more ticks.
        for _ in 0..3 {
            sampler.tick(&mut source, &mut sink);
        }
        sampler.tick(&mut source, &mut sink);
        assert_eq!(sink.last, 7);
        sampler.tick(&mut source, &mut sink);
        assert_eq!(sink.last, 8);
    }
}
