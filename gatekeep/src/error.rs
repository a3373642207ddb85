//! Typed errors for the verification gate.
//!
//! [`GateError`] separates the failures a single verification can run into:
//! - Retryable failures (transport faults, HTTP 5xx) - wait and try again
//! - Terminal failures (any other non-200 status) - deny straight away
//! - Policy rejections (no reply reference, exhausted budget)
//!
//! None of these leave the gate; they are logged and reduced to a deny.
//! [`ConfigError`] is the only error callers see, and only at startup.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Why a message was not allowed through the gate.
#[derive(Debug, Error)]
pub enum GateError {
    /// The message carries no usable `In-Reply-To` header.
    #[error("Message has no reply reference")]
    MissingToken,

    /// The request never produced a response (refused, timed out, DNS, TLS, ...).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The verification service answered with a 5xx status.
    #[error("Verification service error: HTTP {0}")]
    Server(u16),

    /// The verification service answered with a non-200 status below 500.
    #[error("Verification rejected: HTTP {0}")]
    Client(u16),

    /// Every permitted attempt ended in a retryable failure.
    #[error("Retry budget exhausted after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        #[source]
        last: Box<GateError>,
    },
}

impl GateError {
    /// Returns `true` if another attempt may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Server(_))
    }

    /// Returns `true` if the failure ends the decision without retrying.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_retryable()
    }

    /// Classify an HTTP status code returned by the verification service.
    ///
    /// Only exactly 200 counts as success.
    pub const fn from_status(status: u16) -> Result<(), Self> {
        match status {
            200 => Ok(()),
            500.. => Err(Self::Server(status)),
            _ => Err(Self::Client(status)),
        }
    }
}

impl From<reqwest::Error> for GateError {
    fn from(error: reqwest::Error) -> Self {
        let kind = if error.is_timeout() {
            "timed out"
        } else if error.is_connect() {
            "connect failed"
        } else {
            "request failed"
        };

        Self::Transport(format!("{kind}: {error}"))
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required configuration field is missing.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A configuration value is invalid.
    #[error("Invalid configuration for {field}: {reason}")]
    InvalidConfiguration { field: &'static str, reason: String },

    /// The configuration file could not be read.
    #[error("Failed to read config from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid RON for this schema.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
