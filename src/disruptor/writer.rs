//! Single-producer reservation and commit.

use crate::disruptor::cursor::{Barrier, CursorRef, Sequence};
use crate::disruptor::idle::{BusySpinIdleStrategy, IdleStrategy};
use crate::macros::trace_trace;
use std::sync::Arc;

/// Reserves and commits ranges on behalf of exactly one producer thread.
///
/// Every method takes `&mut self`, so the borrow checker — not a runtime
/// check — is what enforces the single-producer precondition: there is
/// no way to call `reserve` from two threads at once without first
/// proving (via `Send`) that only one of them can hold the `&mut`.
pub struct Writer {
    written: CursorRef,
    upstream: Arc<dyn Barrier>,
    capacity: u64,
    previous: Sequence,
    gate: Sequence,
    idle: Arc<dyn IdleStrategy>,
}

impl Writer {
    pub(crate) fn new(written: CursorRef, upstream: Arc<dyn Barrier>, capacity: u64) -> Self {
        Self {
            written,
            upstream,
            capacity,
            previous: 0,
            gate: 0,
            idle: Arc::new(BusySpinIdleStrategy),
        }
    }

    pub(crate) fn set_idle_strategy(&mut self, idle: Arc<dyn IdleStrategy>) {
        self.idle = idle;
    }

    /// Reserves the next `count` sequences, spinning until downstream
    /// consumers have freed enough capacity. Returns the upper (highest)
    /// sequence of the reserved range; the lower bound is
    /// `returned - count + 1`.
    pub fn reserve(&mut self, count: u64) -> Sequence {
        debug_assert!(count >= 1, "reserve count must be at least 1");
        self.previous += count;
        self.await_capacity(self.previous);
        self.previous
    }

    /// Blocks until capacity exists for sequence `next`, without
    /// reserving anything. Useful for callers that want to confirm
    /// capacity before writing into a slot they already know the index
    /// of.
    pub fn await_capacity(&mut self, next: Sequence) {
        let mut idle_count = 0u64;
        // `next - gate > capacity` is expressed as wrapping subtraction
        // in the high-minus-low direction. `next >= gate` always holds,
        // so this never underflows; computing it the other way around
        // (`next - capacity > gate`) underflows during ring warm-up,
        // whenever `next < capacity`.
        while next.wrapping_sub(self.gate) > self.capacity {
            self.idle.idle(idle_count);
            idle_count += 1;
            self.gate = self.upstream.read(0);
        }
        trace_trace!(next, gate = self.gate, "writer capacity available");
    }

    /// Publishes `upper` as the writer's new position. `lower` is
    /// accepted for symmetry with [`super::shared_writer::SharedWriter::commit`]
    /// and ignored here — a single producer's commits are always
    /// contiguous with its own prior commit.
    pub fn commit(&mut self, _lower: Sequence, upper: Sequence) {
        self.written.store(upper);
    }
}
