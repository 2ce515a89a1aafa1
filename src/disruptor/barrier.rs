//! Read-side barriers: aggregating several upstream cursors into one.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::disruptor::cursor::{Barrier, CursorRef, Sequence};
use crate::error::{DisruptorError, Result};
use crate::macros::trace_debug;

/// The minimum of a fixed set of upstream cursors.
///
/// Used both as the gate a single-producer [`super::writer::Writer`]
/// reads to find the slowest downstream consumer, and as the upstream
/// for any consumer group with more than one peer.
pub struct CompositeBarrier {
    upstreams: Vec<CursorRef>,
}

impl CompositeBarrier {
    /// Fails with [`DisruptorError::InvalidConfiguration`] if `upstreams`
    /// is empty — a barrier with nothing to aggregate has no sensible
    /// `read` result.
    pub fn new(upstreams: Vec<CursorRef>) -> Result<Self> {
        if upstreams.is_empty() {
            return Err(DisruptorError::config(
                "CompositeBarrier requires at least one upstream cursor",
            ));
        }
        Ok(Self { upstreams })
    }
}

impl Barrier for CompositeBarrier {
    fn read(&self, _lower: Sequence) -> Sequence {
        self.upstreams
            .iter()
            .map(|c| c.load())
            .min()
            .expect("upstreams is non-empty by construction")
    }
}

/// Per-slot commit-availability table for multi-producer publishing.
///
/// `committed[i]` records the *generation* (`seq >> shift`) of the
/// sequence that most recently committed into slot `i`. A reader scans
/// upward from `lower` and stops at the first slot whose recorded
/// generation doesn't match the generation `lower` itself would occupy,
/// which is how out-of-order commits from independent producers become
/// visible downstream only once every intervening sequence has landed.
///
/// Cells start one generation behind the first valid generation
/// (`u32::MAX`, i.e. `0u32.wrapping_sub(1)`) rather than `0`. Starting at
/// `0` would coincide with the very first lap's generation and make
/// every untouched cell look already-committed during ring warm-up.
pub struct SharedWriterBarrier {
    written: CursorRef,
    committed: Box<[AtomicU32]>,
    mask: u64,
    shift: u32,
}

impl SharedWriterBarrier {
    pub fn new(written: CursorRef, capacity: u64) -> Result<Self> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(DisruptorError::config(
                "SharedWriterBarrier capacity must be a positive power of two",
            ));
        }
        let sentinel_generation = 0u32.wrapping_sub(1);
        let committed = (0..capacity)
            .map(|_| AtomicU32::new(sentinel_generation))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Ok(Self {
            written,
            committed,
            mask: capacity - 1,
            shift: capacity.trailing_zeros(),
        })
    }

    #[inline]
    fn generation_of(&self, seq: Sequence) -> u32 {
        (seq >> self.shift) as u32
    }

    /// Marks `seq` as committed for its generation. Called by
    /// [`super::shared_writer::SharedWriter::commit`] once per slot, from
    /// `upper` down to `lower`, so that the moment the lowest cell in a
    /// commit becomes visible with the new generation, every higher cell
    /// in that same commit already bears it too.
    pub(crate) fn mark_committed(&self, seq: Sequence) {
        let idx = (seq & self.mask) as usize;
        self.committed[idx].store(self.generation_of(seq), Ordering::Release);
    }

    pub(crate) fn written_cursor(&self) -> &CursorRef {
        &self.written
    }
}

impl Barrier for SharedWriterBarrier {
    fn read(&self, lower: Sequence) -> Sequence {
        // `lower` is 0 only before anything has ever been reserved; the
        // first real sequence is 1, so start the scan there regardless.
        let lower = lower.max(1);
        self.read_from(lower, self.written.load())
    }
}

impl SharedWriterBarrier {
    fn read_from(&self, lower: Sequence, upper: Sequence) -> Sequence {
        if upper < lower {
            return lower.wrapping_sub(1);
        }
        let mut seq = lower;
        while seq <= upper {
            let idx = (seq & self.mask) as usize;
            let want = self.generation_of(seq);
            if self.committed[idx].load(Ordering::Acquire) != want {
                trace_debug!(seq, "shared writer barrier gap");
                return seq.wrapping_sub(1);
            }
            seq += 1;
        }
        upper
    }
}
