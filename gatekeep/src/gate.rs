use gatekeep_common::internal;

use crate::{
    config::GatekeepConfig,
    error::{ConfigError, GateError},
    policy::{RetryPolicy, Transition},
    request::VerificationRequest,
    token::ReplyToken,
    verifier::{HttpVerifier, Verifier},
};

/// The result of a gate decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Allow,
    Deny,
}

impl Outcome {
    pub const fn is_allow(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Verifies reply references against the verification service, retrying
/// transient failures within a fixed budget.
///
/// The gate holds nothing but its verifier and an immutable policy, so one
/// instance can serve any number of concurrent decisions.
#[derive(Debug, Clone)]
pub struct VerifyingGate<V = HttpVerifier> {
    verifier: V,
    policy: RetryPolicy,
}

impl VerifyingGate<HttpVerifier> {
    /// Build a gate talking HTTP to the configured service.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn from_config(config: &GatekeepConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(HttpVerifier::new(config)?, config.retry_policy()))
    }
}

impl<V: Verifier> VerifyingGate<V> {
    pub const fn new(verifier: V, policy: RetryPolicy) -> Self {
        Self { verifier, policy }
    }

    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub const fn verifier(&self) -> &V {
        &self.verifier
    }

    /// Decide whether a message carrying `token` may be accepted.
    ///
    /// Never fails: every error is logged and reduced to [`Outcome::Deny`].
    #[tracing::instrument(level = "debug", skip_all, fields(token = token.map(ReplyToken::as_str)))]
    pub async fn decide(&self, token: Option<&ReplyToken>) -> Outcome {
        match self.verify(token).await {
            Ok(()) => {
                internal!(level = DEBUG, "Reply reference verified");
                Outcome::Allow
            }
            Err(err) => {
                internal!(level = INFO, "Denying message: {err}");
                Outcome::Deny
            }
        }
    }

    /// Run the verification and report why it failed, if it did.
    ///
    /// # Errors
    /// - [`GateError::MissingToken`] if `token` is `None`; no request is made
    /// - [`GateError::Client`] on the first non-200 status below 500
    /// - [`GateError::RetryExhausted`] once every retry has been used up
    pub async fn verify(&self, token: Option<&ReplyToken>) -> Result<(), GateError> {
        let token = token.ok_or(GateError::MissingToken)?;
        let request = VerificationRequest::from(token);
        let mut budget = self.policy.budget();

        loop {
            let attempt = self.verifier.verify(&request).await;

            match Transition::next(attempt, &mut budget) {
                Transition::Allow => return Ok(()),
                Transition::Deny(err) => return Err(err),
                Transition::Retry(err) => {
                    internal!(
                        level = WARN,
                        "Verification of {token} failed ({err}), retrying in {:?} ({} retries left)",
                        self.policy.delay,
                        budget.remaining()
                    );

                    tokio::time::sleep(self.policy.delay).await;
                }
            }
        }
    }
}
