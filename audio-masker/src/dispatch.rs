//! Deferred dispatch queue between the timer ISR and the worker context.
//!
//! The ISR produces one [`DispatchEvent`] per completed block; the worker
//! consumes them in order and runs the selected algorithm. The queue is a
//! lock-free single-producer single-consumer ring (Lamport algorithm) with
//! atomic indices, so the ISR side never blocks and never allocates.
//!
//! # Safety Contract
//!
//! - Only ONE context may call [`try_enqueue()`](DispatchQueue::try_enqueue)
//!   (the ISR).
//! - Only ONE context may call [`try_dequeue()`](DispatchQueue::try_dequeue)
//!   (the worker).
//! - These may run concurrently at different priorities.

use core::cell::UnsafeCell;
use core::sync::atomic::{AtomicUsize, Ordering};

/// A ready-block notification handed from the ISR to the worker.
///
/// Produced once per block boundary, consumed exactly once, never retained
/// past that single consumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchEvent {
    /// Start of the completed input block the algorithm reads.
    pub input_pos: usize,
    /// Start of the output block the algorithm fills.
    pub output_pos: usize,
    /// Buffer tick count at dispatch, for the deadline-miss check.
    pub tick: u32,
}

impl DispatchEvent {
    const EMPTY: DispatchEvent = DispatchEvent {
        input_pos: 0,
        output_pos: 0,
        tick: 0,
    };
}

/// Bounded FIFO of dispatch events.
///
/// `N` is the total slot count; usable capacity is `N - 1` (one slot is
/// reserved for full/empty disambiguation). Events are `Copy`, so slots
/// hold plain values and no drop handling is needed.
pub struct DispatchQueue<const N: usize> {
    slots: [UnsafeCell<DispatchEvent>; N],
    /// Write index (only modified by the producer).
    head: AtomicUsize,
    /// Read index (only modified by the consumer).
    tail: AtomicUsize,
}

// SAFETY: the SPSC contract ensures head is only advanced by the producer
// and tail only by the consumer; release/acquire ordering on the indices
// makes slot writes visible before the matching index advance.
unsafe impl<const N: usize> Sync for DispatchQueue<N> {}

impl<const N: usize> DispatchQueue<N> {
    /// Create a new empty queue.
    ///
    /// # Panics
    ///
    /// Compile-time assertion: `N` must be at least 2 (usable capacity `N - 1`).
    pub const fn new() -> Self {
        assert!(N >= 2, "dispatch queue must have at least 2 slots");

        DispatchQueue {
            slots: [const { UnsafeCell::new(DispatchEvent::EMPTY) }; N],
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
        }
    }

    /// Enqueue an event (ISR side). Non-blocking.
    ///
    /// Returns `false` if the queue is full; the caller counts the drop
    /// and continues — retrying from interrupt context would violate the
    /// no-block contract.
    #[must_use]
    pub fn try_enqueue(&self, event: DispatchEvent) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let next_head = (head + 1) % N;

        if next_head == self.tail.load(Ordering::Acquire) {
            return false; // full — block's output goes stale this cycle
        }

        // SAFETY: sole producer; `next_head != tail` means the consumer
        // does not hold this slot.
        unsafe { *self.slots[head].get() = event };

        // Release: the slot write must be visible before head advances.
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Dequeue the oldest event (worker side).
    ///
    /// Returns `None` if the queue is empty.
    pub fn try_dequeue(&self) -> Option<DispatchEvent> {
        let tail = self.tail.load(Ordering::Relaxed);

        if tail == self.head.load(Ordering::Acquire) {
            return None;
        }

        // SAFETY: sole consumer; `tail != head` means this slot holds a
        // value the producer published.
        let event = unsafe { *self.slots[tail].get() };

        self.tail.store((tail + 1) % N, Ordering::Release);
        Some(event)
    }

    /// Check if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Acquire) == self.head.load(Ordering::Acquire)
    }

    /// Check if the queue is full.
    pub fn is_full(&self) -> bool {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + 1) % N == tail
    }

    /// Number of events currently queued.
    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Acquire);
        let tail = self.tail.load(Ordering::Acquire);
        (head + N - tail) % N
    }
}

impl<const N: usize> Default for DispatchQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
