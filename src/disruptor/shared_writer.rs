//! Multi-producer reservation and commit.

use std::sync::Arc;

use crate::disruptor::barrier::SharedWriterBarrier;
use crate::disruptor::cursor::{Barrier, Cursor, CursorRef, Sequence};
use crate::disruptor::idle::{BusySpinIdleStrategy, IdleStrategy};
use crate::macros::trace_trace;

/// A reservation/commit handle shared by any number of producer threads.
///
/// `SharedWriter` is `Clone`; every clone shares the same claim cursor,
/// gate cache, and commit table, so the intended usage is to clone one
/// into each producer thread (mirroring how the teacher's
/// `Arc<MpscRingBuffer<T>>` is shared across producer threads).
#[derive(Clone)]
pub struct SharedWriter {
    barrier: Arc<SharedWriterBarrier>,
    upstream: Arc<dyn Barrier>,
    capacity: u64,
    gate: Arc<Cursor>,
    idle: Arc<dyn IdleStrategy>,
}

impl SharedWriter {
    pub(crate) fn new(
        barrier: Arc<SharedWriterBarrier>,
        upstream: Arc<dyn Barrier>,
        capacity: u64,
    ) -> Self {
        Self {
            barrier,
            upstream,
            capacity,
            gate: Arc::new(Cursor::new(0)),
            idle: Arc::new(BusySpinIdleStrategy),
        }
    }

    pub(crate) fn set_idle_strategy(&mut self, idle: Arc<dyn IdleStrategy>) {
        self.idle = idle;
    }

    /// Reserves the next `count` sequences via compare-and-swap,
    /// spinning on capacity and retrying on a lost race with another
    /// producer. Returns the upper (highest) sequence of the reserved
    /// range.
    pub fn reserve(&self, count: u64) -> Sequence {
        debug_assert!(count >= 1, "reserve count must be at least 1");
        let written = self.barrier.written_cursor();
        loop {
            let previous = written.load();
            let upper = previous + count;
            self.await_capacity(upper);

            if written.compare_exchange_weak(previous, upper).is_ok() {
                return upper;
            }
            // Lost the race to another producer; retry from scratch.
        }
    }

    fn await_capacity(&self, upper: Sequence) {
        let mut idle_count = 0u64;
        let mut gate = self.gate.load();
        while upper.wrapping_sub(gate) > self.capacity {
            self.idle.idle(idle_count);
            idle_count += 1;
            gate = self.upstream.read(0);
            self.gate.store(gate);
        }
        trace_trace!(upper, gate, "shared writer capacity available");
    }

    /// Marks every slot in `[lower, upper]` as committed, from `upper`
    /// down to `lower`. Writing top-down (via a reversed inclusive Rust
    /// range — never a hand-decremented loop, so there is no underflow
    /// hazard at `upper == 0` or `lower == upper`) guarantees that the
    /// instant the lowest cell becomes visible with its new generation,
    /// every higher cell in this same commit already carries it too —
    /// otherwise a concurrent reader could observe a torn range.
    pub fn commit(&self, lower: Sequence, upper: Sequence) {
        for seq in (lower..=upper).rev() {
            self.barrier.mark_committed(seq);
        }
    }
}
