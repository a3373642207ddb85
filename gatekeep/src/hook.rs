//! The pipeline-facing side of gatekeep.
//!
//! A mail pipeline builds one [`Gatekeep`] at startup and calls
//! [`Gatekeep::data_post`] once the message body has been received. The
//! hook reads the reply reference, asks the gate, and answers with a
//! [`Directive`].

use gatekeep_common::{context::Context, internal, status::Status};

use crate::{
    config::GatekeepConfig,
    error::ConfigError,
    gate::{Outcome, VerifyingGate},
    token,
    verifier::{HttpVerifier, Verifier},
};

/// Response text sent with a rejection
pub const DENY_RESPONSE: &str = "5.7.1 Message not accepted: unknown reply reference";

/// What the pipeline should do with the message next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Continue,
    Deny,
}

impl From<Outcome> for Directive {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Allow => Self::Continue,
            Outcome::Deny => Self::Deny,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Gatekeep<V = HttpVerifier> {
    gate: VerifyingGate<V>,
}

impl Gatekeep<HttpVerifier> {
    /// Build the hook from its configuration section.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &GatekeepConfig) -> Result<Self, ConfigError> {
        internal!(level = INFO, "Gatekeep configured: {config:?}");
        Ok(Self::new(VerifyingGate::from_config(config)?))
    }
}

impl<V: Verifier> Gatekeep<V> {
    pub const fn new(gate: VerifyingGate<V>) -> Self {
        Self { gate }
    }

    pub const fn gate(&self) -> &VerifyingGate<V> {
        &self.gate
    }

    /// Runs after the message data has been received.
    ///
    /// On deny the context response is set to a permanent rejection. On
    /// continue the response is left alone for later hooks to fill in.
    #[tracing::instrument(level = "debug", skip_all, fields(id = context.id()))]
    pub async fn data_post(&self, context: &mut Context) -> Directive {
        let token = token::extract(context);
        if token.is_none() {
            internal!(level = DEBUG, "No In-Reply-To header on {}", context.id());
        }

        let directive = Directive::from(self.gate.decide(token.as_ref()).await);

        if directive == Directive::Deny {
            context.response = Some((Status::Error, DENY_RESPONSE.to_string()));
        }

        internal!("{} = {directive:?}", context.id());
        directive
    }
}
