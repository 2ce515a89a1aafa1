//! Top-level handles returned by a [`super::Builder`]/[`super::SharedBuilder`].

use crate::disruptor::reader::Reader;
use crate::disruptor::shared_writer::SharedWriter;
use crate::disruptor::writer::Writer;
use crate::macros::trace_debug;

/// A built single-producer topology: one [`Writer`] plus every reader in
/// the consumer-group pipeline it feeds.
pub struct Disruptor {
    writer: Writer,
    readers: Vec<Reader>,
    started: bool,
}

impl Disruptor {
    pub(crate) fn new(writer: Writer, readers: Vec<Reader>) -> Self {
        Self {
            writer,
            readers,
            started: false,
        }
    }

    /// The producer handle. Exclusive by construction (`&mut`).
    pub fn writer(&mut self) -> &mut Writer {
        &mut self.writer
    }

    /// Spawns every reader's worker thread. Idempotent no-op if already started.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        trace_debug!(readers = self.readers.len(), "starting disruptor");
        for reader in &mut self.readers {
            reader.start();
        }
        self.started = true;
    }

    /// Signals every reader to stop and joins its worker thread.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        for reader in &mut self.readers {
            reader.stop();
        }
        self.started = false;
    }
}

impl Drop for Disruptor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A built multi-producer topology: a cloneable [`SharedWriter`] plus
/// every reader in the consumer-group pipeline it feeds.
pub struct SharedDisruptor {
    writer: SharedWriter,
    readers: Vec<Reader>,
    started: bool,
}

impl SharedDisruptor {
    pub(crate) fn new(writer: SharedWriter, readers: Vec<Reader>) -> Self {
        Self {
            writer,
            readers,
            started: false,
        }
    }

    /// A cheap clone of the shared producer handle; hand one to each
    /// producer thread.
    pub fn writer(&self) -> SharedWriter {
        self.writer.clone()
    }

    pub fn start(&mut self) {
        if self.started {
            return;
        }
        trace_debug!(readers = self.readers.len(), "starting shared disruptor");
        for reader in &mut self.readers {
            reader.start();
        }
        self.started = true;
    }

    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        for reader in &mut self.readers {
            reader.stop();
        }
        self.started = false;
    }
}

impl Drop for SharedDisruptor {
    fn drop(&mut self) {
        self.stop();
    }
}
