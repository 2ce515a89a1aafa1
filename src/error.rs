//! Error types for ringcore.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DisruptorError>;

/// Errors produced while assembling a [`crate::disruptor::Builder`] or
/// [`crate::disruptor::SharedBuilder`] topology.
///
/// Every variant here is a configuration-time error: the core has no
/// operational error paths once a topology is built (see the crate's
/// design notes on error handling).
#[derive(Error, Debug)]
pub enum DisruptorError {
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl DisruptorError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }
}
