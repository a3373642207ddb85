//! Reply-reference extraction.
//!
//! Only replies to messages we sent are eligible, and the `In-Reply-To`
//! header is what ties a reply back to the outbound thread.

use std::fmt::{self, Display};

use gatekeep_common::context::Context;

pub const IN_REPLY_TO: &str = "In-Reply-To";

/// A trimmed, non-empty `In-Reply-To` value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReplyToken(String);

impl ReplyToken {
    /// Returns `None` if `raw` is empty once surrounding whitespace is removed.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ReplyToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for ReplyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pull the reply reference out of a message, if it has one.
///
/// A missing, empty or whitespace-only header yields `None`.
pub fn extract(context: &Context) -> Option<ReplyToken> {
    context.header(IN_REPLY_TO).and_then(ReplyToken::new)
}
