//! Circular sample buffer pair shared between the timer ISR and the worker.
//!
//! [`BufferPair`] holds the ADC input ring and the DAC output ring together
//! with their cursors. The ISR touches one element per tick at each cursor;
//! the worker touches one whole block per dispatch event. No lock protects
//! the storage — safety comes entirely from the fixed block partition:
//!
//! - Capacity `C` is evenly divisible by block size `B`, so block
//!   boundaries never straddle the wraparound point.
//! - The output cursor trails the input cursor by exactly `B` (mod `C`)
//!   at all times between ticks.
//! - A dispatch event hands the worker the input block that just
//!   completed and the output block the output cursor will enter one
//!   block period later. Both ranges are disjoint from every position
//!   the ISR touches during that period.
//!
//! A monotonically increasing tick counter supports the worker's
//! deadline-miss check: if more than `B` ticks elapse between dispatch
//! and completion, the output cursor has entered the block being written.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

/// Fixed-capacity input/output ring pair with an atomic cursor pair.
///
/// `C` is the capacity in samples, `B` the algorithm block size. Input
/// samples are 12-bit ADC readings stored as `u16`; output samples are
/// 8-bit DAC values.
///
/// All operations are O(1), branch-light and allocation-free. The type is
/// `Sync` so it can live in a `static` shared between the interrupt and
/// worker contexts.
pub struct BufferPair<const C: usize, const B: usize> {
    input: UnsafeCell<[u16; C]>,
    output: UnsafeCell<[u8; C]>,
    /// Input (write) cursor. Only advanced by the ISR.
    input_cursor: AtomicUsize,
    /// Output (read) cursor. Only advanced by the ISR.
    output_cursor: AtomicUsize,
    /// Total samples acquired since reset. Wraps at `u32::MAX`.
    ticks: AtomicU32,
}

// SAFETY: cursors and the tick counter are atomics. The sample storage is
// partitioned by the cursor-offset invariant: the ISR accesses single
// elements at the current cursors, the worker accesses only block ranges
// handed to it by a dispatch event, and those ranges are disjoint from the
// cursor positions for one block period. The unsafe accessors below state
// the per-call obligations.
unsafe impl<const C: usize, const B: usize> Sync for BufferPair<C, B> {}

impl<const C: usize, const B: usize> BufferPair<C, B> {
    /// Create a zeroed buffer pair with the output cursor trailing the
    /// input cursor by one block.
    ///
    /// # Panics
    ///
    /// Compile-time assertion (when used in a `const`/`static` context):
    /// `B` must be nonzero and divide `C`. Runtime construction should be
    /// guarded by [`PipelineConfig::validate`](crate::config::PipelineConfig::validate).
    pub const fn new() -> Self {
        assert!(B >= 1 && B <= C, "block size must be in 1..=capacity");
        assert!(C % B == 0, "block size must divide buffer capacity");

        BufferPair {
            input: UnsafeCell::new([0u16; C]),
            output: UnsafeCell::new([0u8; C]),
            input_cursor: AtomicUsize::new(0),
            output_cursor: AtomicUsize::new(C - B),
            ticks: AtomicU32::new(0),
        }
    }

    /// Current input (write) cursor position.
    pub fn input_pos(&self) -> usize {
        self.input_cursor.load(Ordering::Acquire)
    }

    /// Current output (read) cursor position.
    pub fn output_pos(&self) -> usize {
        self.output_cursor.load(Ordering::Acquire)
    }

    /// Total samples acquired since construction.
    pub fn ticks(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    /// Advance the input cursor one step (mod `C`) and count one tick.
    ///
    /// Returns the position that was just consumed. Called only from the
    /// ISR context, once per tick.
    pub fn advance_input(&self) -> usize {
        let pos = self.input_cursor.load(Ordering::Relaxed);
        self.input_cursor.store((pos + 1) % C, Ordering::Release);
        self.ticks.fetch_add(1, Ordering::Release);
        pos
    }

    /// Advance the output cursor one step (mod `C`).
    ///
    /// Returns the position that was just produced. Called only from the
    /// ISR context, once per tick, paired with [`advance_input`](Self::advance_input).
    pub fn advance_output(&self) -> usize {
        let pos = self.output_cursor.load(Ordering::Relaxed);
        self.output_cursor.store((pos + 1) % C, Ordering::Release);
        pos
    }

    /// Store one ADC sample at `pos`.
    ///
    /// # Safety
    ///
    /// Must only be called from the single ISR context, with `pos` equal
    /// to the current input cursor. Any other position may alias a block
    /// range held by the worker.
    pub unsafe fn store_input(&self, pos: usize, sample: u16) {
        debug_assert!(pos < C);
        unsafe { (*self.input.get())[pos] = sample };
    }

    /// Load one DAC sample from `pos`.
    ///
    /// # Safety
    ///
    /// Must only be called from the single ISR context, with `pos` equal
    /// to the current output cursor.
    pub unsafe fn load_output(&self, pos: usize) -> u8 {
        debug_assert!(pos < C);
        unsafe { (*self.output.get())[pos] }
    }

    /// Borrow the input block starting at `pos`.
    ///
    /// # Safety
    ///
    /// `pos` must be the block-aligned input position of a dispatch event
    /// the caller dequeued, and the borrow must end before the input
    /// cursor re-enters the range (one buffer period).
    pub unsafe fn input_block(&self, pos: usize) -> &[u16] {
        debug_assert!(pos < C && pos % B == 0);
        let data = unsafe { &*self.input.get() };
        &data[pos..pos + B]
    }

    /// Mutably borrow the output block starting at `pos`.
    ///
    /// # Safety
    ///
    /// `pos` must be the block-aligned output position of a dispatch event
    /// the caller dequeued, and the borrow must end before the output
    /// cursor enters the range (one block period after dispatch).
    #[allow(clippy::mut_from_ref)]
    pub unsafe fn output_block_mut(&self, pos: usize) -> &mut [u8] {
        debug_assert!(pos < C && pos % B == 0);
        let data = unsafe { &mut *self.output.get() };
        &mut data[pos..pos + B]
    }
}

impl<const C: usize, const B: usize> Default for BufferPair<C, B> {
    fn default() -> Self {
        Self::new()
    }
}
