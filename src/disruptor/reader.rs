//! Worker-thread consumer loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::disruptor::cursor::{Barrier, CursorRef, Sequence};
use crate::disruptor::idle::{BusySpinIdleStrategy, IdleStrategy};
use crate::macros::trace_debug;

/// Invoked by a [`Reader`]'s worker thread with each newly committed,
/// inclusive sequence range.
///
/// Implementations must process every sequence in `[lower, upper]`
/// before returning: once `consume` returns, the reader advances its
/// own cursor, and slot payloads in that range may be overwritten by a
/// producer on the next lap.
pub trait Consumer: Send + 'static {
    fn consume(&mut self, lower: Sequence, upper: Sequence);
}

impl<F> Consumer for F
where
    F: FnMut(Sequence, Sequence) + Send + 'static,
{
    fn consume(&mut self, lower: Sequence, upper: Sequence) {
        self(lower, upper)
    }
}

/// Owns one cursor, reads from one upstream [`Barrier`], and drives one
/// [`Consumer`] on a dedicated worker thread.
pub struct Reader {
    cursor: CursorRef,
    upstream: Arc<dyn Barrier>,
    stop: Arc<AtomicBool>,
    idle: Arc<dyn IdleStrategy>,
    worker: Option<JoinHandle<()>>,
    consumer: Option<Box<dyn Consumer>>,
    name: &'static str,
}

impl Reader {
    pub(crate) fn new(
        cursor: CursorRef,
        upstream: Arc<dyn Barrier>,
        consumer: Box<dyn Consumer>,
        name: &'static str,
    ) -> Self {
        Self {
            cursor,
            upstream,
            stop: Arc::new(AtomicBool::new(false)),
            idle: Arc::new(BusySpinIdleStrategy),
            worker: None,
            consumer: Some(consumer),
            name,
        }
    }

    pub(crate) fn set_idle_strategy(&mut self, idle: Arc<dyn IdleStrategy>) {
        self.idle = idle;
    }

    pub(crate) fn cursor(&self) -> CursorRef {
        self.cursor.clone()
    }

    /// Spawns the worker thread. Panics if already started.
    pub(crate) fn start(&mut self) {
        assert!(self.worker.is_none(), "reader already started");
        let mut consumer = self
            .consumer
            .take()
            .expect("consumer already moved into a running worker");
        let cursor = self.cursor.clone();
        let upstream = Arc::clone(&self.upstream);
        let stop = Arc::clone(&self.stop);
        let idle = Arc::clone(&self.idle);
        let name = self.name;

        trace_debug!(name, "starting reader worker");
        self.worker = Some(std::thread::spawn(move || {
            let mut idle_count = 0u64;
            loop {
                let lower = cursor.load() + 1;
                let upper = upstream.read(lower);
                if upper >= lower {
                    consumer.consume(lower, upper);
                    cursor.store(upper);
                    idle_count = 0;
                } else {
                    idle.idle(idle_count);
                    idle_count += 1;
                }
                if stop.load(Ordering::Relaxed) {
                    break;
                }
            }
            trace_debug!(name, "reader worker stopped");
        }));
    }

    /// Signals the worker to exit after its current iteration and joins
    /// it. A no-op if the reader was never started.
    pub(crate) fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.worker.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disruptor::cursor::{Cursor, CursorTable};
    use std::sync::{Arc as StdArc, Mutex};

    #[test]
    fn reader_drains_committed_range_then_stops() {
        let table: CursorTable = StdArc::from(vec![Cursor::new(0), Cursor::new(0)]);
        let upstream_cursor = CursorRef::new(table.clone(), 0);
        let reader_cursor = CursorRef::new(table.clone(), 1);

        let seen: StdArc<Mutex<Vec<(Sequence, Sequence)>>> = StdArc::new(Mutex::new(Vec::new()));
        let seen_for_consumer = seen.clone();
        let consumer: Box<dyn Consumer> = Box::new(move |lower, upper| {
            seen_for_consumer.lock().unwrap().push((lower, upper));
        });

        let upstream: Arc<dyn Barrier> = Arc::new(upstream_cursor.clone());
        let mut reader = Reader::new(reader_cursor, upstream, consumer, "test");
        reader.start();

        upstream_cursor.store(5);
        // Give the worker a moment to observe the commit.
        for _ in 0..1000 {
            if seen.lock().unwrap().iter().map(|(_, u)| *u).max() == Some(5) {
                break;
            }
            std::thread::yield_now();
        }
        reader.stop();

        let log = seen.lock().unwrap();
        let total: Vec<Sequence> = log
            .iter()
            .flat_map(|&(lo, hi)| lo..=hi)
            .collect();
        assert_eq!(total, (1..=5).collect::<Vec<_>>());
    }
}
