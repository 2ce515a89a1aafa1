//! Padded atomic sequence counter and its contiguous backing store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A monotonically increasing position in the sequence space.
///
/// `0` is the sentinel meaning "nothing reserved or committed yet"; the
/// first real sequence produced by a writer is `1`.
pub type Sequence = u64;

pub(crate) const INITIAL_SEQUENCE: Sequence = 0;

/// Cache-line padded atomic sequence counter.
///
/// 128-byte alignment spans two cache lines so a `Cursor` never shares a
/// line with a neighbor, even on CPUs with an adjacent-line prefetcher.
/// `Cursor`s are never relocated after a [`super::Builder`] freezes them,
/// so the padding is only useful because the backing array is itself
/// contiguous and stable — see [`CursorTable`].
#[repr(align(128))]
pub struct Cursor {
    sequence: AtomicU64,
}

impl Cursor {
    pub(crate) fn new(initial: Sequence) -> Self {
        Self {
            sequence: AtomicU64::new(initial),
        }
    }

    /// Publishes `value` with release ordering.
    #[inline]
    pub fn store(&self, value: Sequence) {
        self.sequence.store(value, Ordering::Release);
    }

    /// Loads the most recently published value with acquire ordering.
    #[inline]
    pub fn load(&self) -> Sequence {
        self.sequence.load(Ordering::Acquire)
    }

    /// Attempts to advance the cursor from `current` to `new`, used by
    /// [`super::shared_writer::SharedWriter`] to claim a range without a
    /// lock. Acquire-release on success (the CAS is the sole publication
    /// point for the claim becoming visible), acquire on failure.
    #[inline]
    pub(crate) fn compare_exchange_weak(
        &self,
        current: Sequence,
        new: Sequence,
    ) -> std::result::Result<Sequence, Sequence> {
        self.sequence
            .compare_exchange_weak(current, new, Ordering::AcqRel, Ordering::Acquire)
    }
}

static_assertions::assert_eq_size!(Cursor, [u8; 128]);

/// Anything that can report "what's the furthest sequence safe to consume
/// from here" given a caller-supplied lower-bound hint.
///
/// A bare [`Cursor`] satisfies this trivially (the hint is irrelevant to
/// a single counter); [`super::barrier::CompositeBarrier`] and
/// [`super::barrier::SharedWriterBarrier`] use the hint to bound a scan.
pub trait Barrier: Send + Sync {
    fn read(&self, lower: Sequence) -> Sequence;
}

impl Barrier for Cursor {
    #[inline]
    fn read(&self, _lower: Sequence) -> Sequence {
        self.load()
    }
}

/// The contiguous, append-only backing array a [`super::Builder`] grows
/// while wiring a topology, frozen into an `Arc<[Cursor]>` at `build()`.
///
/// Handing out `Arc<Cursor>` per cursor (as a naive port of a Go
/// `[]*Cursor` would) puts each cursor in its own allocation, so same-group
/// cursors are not actually adjacent in memory despite what such a design
/// claims. Freezing one growable `Vec<Cursor>` into a single `Arc<[Cursor]>`
/// and indexing into it keeps the layout genuinely contiguous.
pub(crate) type CursorTable = Arc<[Cursor]>;

/// A cheap, `Clone`-able handle into a frozen [`CursorTable`].
#[derive(Clone)]
pub struct CursorRef {
    table: CursorTable,
    index: usize,
}

impl CursorRef {
    pub(crate) fn new(table: CursorTable, index: usize) -> Self {
        Self { table, index }
    }

    #[inline]
    fn cursor(&self) -> &Cursor {
        &self.table[self.index]
    }

    #[inline]
    pub fn store(&self, value: Sequence) {
        self.cursor().store(value);
    }

    #[inline]
    pub fn load(&self) -> Sequence {
        self.cursor().load()
    }

    #[inline]
    pub(crate) fn compare_exchange_weak(
        &self,
        current: Sequence,
        new: Sequence,
    ) -> std::result::Result<Sequence, Sequence> {
        self.cursor().compare_exchange_weak(current, new)
    }
}

impl Barrier for CursorRef {
    #[inline]
    fn read(&self, _lower: Sequence) -> Sequence {
        self.load()
    }
}
