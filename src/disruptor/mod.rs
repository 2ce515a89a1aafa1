//! Sequence-coordination primitives (LMAX Disruptor pattern).
//!
//! - `Builder` / `Disruptor` - single producer, any number of pipelined consumer groups
//! - `SharedBuilder` / `SharedDisruptor` - multiple producers (CAS-based), same pipeline shape

mod barrier;
mod builder;
mod cursor;
mod facade;
mod idle;
mod reader;
mod shared_writer;
mod writer;

pub use barrier::{CompositeBarrier, SharedWriterBarrier};
pub use builder::{Builder, SharedBuilder};
pub use cursor::{Barrier, Cursor, CursorRef, Sequence};
pub use facade::{Disruptor, SharedDisruptor};
pub use idle::{BusySpinIdleStrategy, IdleStrategy, SleepingIdleStrategy, YieldingIdleStrategy};
pub use reader::Consumer;
pub use shared_writer::SharedWriter;
pub use writer::Writer;
