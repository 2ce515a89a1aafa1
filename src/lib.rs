//! Sequence-coordination core for an LMAX Disruptor-style ring buffer.
//!
//! `ringcore` is the hard middle of a Disruptor: a pre-allocated ring of
//! slots coordinated entirely through atomic sequence counters. It owns
//! no payload storage — callers plug their own ring array in alongside
//! a [`disruptor::Builder`]/[`disruptor::SharedBuilder`] topology and
//! implement [`disruptor::Consumer`] to be invoked with ready ranges.
//!
//! - [`disruptor::Writer`] — single-producer reservation/commit.
//! - [`disruptor::SharedWriter`] — multi-producer (CAS-based) reservation/commit.
//! - [`disruptor::Reader`] — worker-thread consumer loop.
//! - [`disruptor::Builder`] / [`disruptor::SharedBuilder`] — topology assembly.
//!
//! No locks, no condition variables, no allocation once a topology is built.

mod macros;

pub mod disruptor;
pub mod error;

pub use error::{DisruptorError, Result};
