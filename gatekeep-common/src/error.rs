//! Error types for the gatekeep-common crate.

use thiserror::Error;

/// Errors that can occur while building a [`Context`](crate::context::Context)
/// from raw message bytes.
#[derive(Debug, Error)]
pub enum MessageParseError {
    /// The header block could not be parsed.
    #[error("Invalid message headers: {0}")]
    Headers(#[from] mailparse::MailParseError),

    /// The message has no header block at all.
    #[error("Message is empty")]
    Empty,
}
