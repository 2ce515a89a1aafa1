//! Assembles cursors, barriers, and readers into a runnable topology.

use std::sync::Arc;

use crate::disruptor::barrier::{CompositeBarrier, SharedWriterBarrier};
use crate::disruptor::cursor::{Barrier, Cursor, CursorRef, CursorTable};
use crate::disruptor::facade::{Disruptor, SharedDisruptor};
use crate::disruptor::idle::IdleStrategy;
use crate::disruptor::reader::{Consumer, Reader};
use crate::disruptor::shared_writer::SharedWriter;
use crate::disruptor::writer::Writer;
use crate::error::{DisruptorError, Result};

const WRITER_CURSOR_INDEX: usize = 0;

struct PendingGroup {
    consumers: Vec<Box<dyn Consumer>>,
    names: Vec<&'static str>,
}

/// Grows a contiguous cursor backing array while consumer groups are
/// added, then freezes it and wires up a single-producer [`Disruptor`].
///
/// Every `add_consumer_group` call consumes `self` and returns an
/// extended builder; Rust's move semantics give the same "builder never
/// aliases stale state" guarantee a value-copying Go builder would, but
/// without actually copying the (growing) cursor backing store on every
/// call.
pub struct Builder {
    capacity: u64,
    cursors: Vec<Cursor>,
    groups: Vec<PendingGroup>,
    idle: Option<Arc<dyn IdleStrategy>>,
}

impl Builder {
    pub fn new(capacity: u64) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            capacity,
            cursors: vec![Cursor::new(0)], // index 0 reserved for the writer cursor
            groups: Vec::new(),
            idle: None,
        })
    }

    /// Installs a shared [`IdleStrategy`] used by every reader and by the
    /// writer's capacity wait. Defaults to busy-spin if never called.
    pub fn with_idle_strategy(mut self, idle: Arc<dyn IdleStrategy>) -> Self {
        self.idle = Some(idle);
        self
    }

    /// Adds one consumer group: all consumers in the group read from the
    /// same upstream and become the upstream for the next group. An
    /// empty `consumers` list leaves the builder unchanged.
    pub fn add_consumer_group(
        mut self,
        consumers: Vec<(&'static str, Box<dyn Consumer>)>,
    ) -> Self {
        if consumers.is_empty() {
            return self;
        }
        let mut names = Vec::with_capacity(consumers.len());
        let mut boxed = Vec::with_capacity(consumers.len());
        for (name, consumer) in consumers {
            self.cursors.push(Cursor::new(0));
            names.push(name);
            boxed.push(consumer);
        }
        self.groups.push(PendingGroup {
            consumers: boxed,
            names,
        });
        self
    }

    pub fn build(self) -> Disruptor {
        let capacity = self.capacity;
        let idle = self.idle;
        let table: CursorTable = Arc::from(self.cursors);

        let writer_cursor = CursorRef::new(table.clone(), WRITER_CURSOR_INDEX);
        let mut upstream: Arc<dyn Barrier> = Arc::new(writer_cursor.clone());
        let mut readers = Vec::new();
        let mut next_index = WRITER_CURSOR_INDEX + 1;

        for group in self.groups {
            let group_size = group.consumers.len();
            let mut group_cursors = Vec::with_capacity(group_size);
            for (consumer, name) in group.consumers.into_iter().zip(group.names) {
                let cursor = CursorRef::new(table.clone(), next_index);
                next_index += 1;
                let mut reader = Reader::new(cursor.clone(), Arc::clone(&upstream), consumer, name);
                if let Some(idle) = &idle {
                    reader.set_idle_strategy(Arc::clone(idle));
                }
                group_cursors.push(cursor);
                readers.push(reader);
            }
            upstream = if group_cursors.len() == 1 {
                Arc::new(group_cursors.into_iter().next().unwrap())
            } else {
                Arc::new(
                    CompositeBarrier::new(group_cursors)
                        .expect("group is non-empty by construction"),
                )
            };
        }

        let mut writer = Writer::new(writer_cursor, upstream, capacity);
        if let Some(idle) = &idle {
            writer.set_idle_strategy(Arc::clone(idle));
        }

        Disruptor::new(writer, readers)
    }
}

/// Parallel builder for the multi-producer (CAS-based) topology.
pub struct SharedBuilder {
    capacity: u64,
    cursors: Vec<Cursor>,
    groups: Vec<PendingGroup>,
    idle: Option<Arc<dyn IdleStrategy>>,
}

impl SharedBuilder {
    pub fn new(capacity: u64) -> Result<Self> {
        validate_capacity(capacity)?;
        Ok(Self {
            capacity,
            cursors: vec![Cursor::new(0)],
            groups: Vec::new(),
            idle: None,
        })
    }

    pub fn with_idle_strategy(mut self, idle: Arc<dyn IdleStrategy>) -> Self {
        self.idle = Some(idle);
        self
    }

    pub fn add_consumer_group(
        mut self,
        consumers: Vec<(&'static str, Box<dyn Consumer>)>,
    ) -> Self {
        if consumers.is_empty() {
            return self;
        }
        let mut names = Vec::with_capacity(consumers.len());
        let mut boxed = Vec::with_capacity(consumers.len());
        for (name, consumer) in consumers {
            self.cursors.push(Cursor::new(0));
            names.push(name);
            boxed.push(consumer);
        }
        self.groups.push(PendingGroup {
            consumers: boxed,
            names,
        });
        self
    }

    pub fn build(self) -> Result<SharedDisruptor> {
        let capacity = self.capacity;
        let idle = self.idle;
        let table: CursorTable = Arc::from(self.cursors);

        let writer_cursor = CursorRef::new(table.clone(), WRITER_CURSOR_INDEX);
        let writer_barrier = Arc::new(SharedWriterBarrier::new(writer_cursor, capacity)?);
        let mut upstream: Arc<dyn Barrier> = writer_barrier.clone();
        let mut readers = Vec::new();
        let mut next_index = WRITER_CURSOR_INDEX + 1;

        for group in self.groups {
            let group_size = group.consumers.len();
            let mut group_cursors = Vec::with_capacity(group_size);
            for (consumer, name) in group.consumers.into_iter().zip(group.names) {
                let cursor = CursorRef::new(table.clone(), next_index);
                next_index += 1;
                let mut reader = Reader::new(cursor.clone(), Arc::clone(&upstream), consumer, name);
                if let Some(idle) = &idle {
                    reader.set_idle_strategy(Arc::clone(idle));
                }
                group_cursors.push(cursor);
                readers.push(reader);
            }
            upstream = if group_cursors.len() == 1 {
                Arc::new(group_cursors.into_iter().next().unwrap())
            } else {
                Arc::new(
                    CompositeBarrier::new(group_cursors)
                        .expect("group is non-empty by construction"),
                )
            };
        }

        let mut writer = SharedWriter::new(writer_barrier, upstream, capacity);
        if let Some(idle) = &idle {
            writer.set_idle_strategy(Arc::clone(idle));
        }

        Ok(SharedDisruptor::new(writer, readers))
    }
}

fn validate_capacity(capacity: u64) -> Result<()> {
    if capacity == 0 || !capacity.is_power_of_two() {
        return Err(DisruptorError::config(
            "ring capacity must be a positive power of two",
        ));
    }
    Ok(())
}
