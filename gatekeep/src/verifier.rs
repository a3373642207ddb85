//! The verification service seam.
//!
//! [`Verifier`] performs exactly one attempt. Retrying, and deciding what a
//! status means, is left to the gate.

use async_trait::async_trait;
use gatekeep_common::{incoming, outgoing};
use reqwest::{Client, Url};

use crate::{
    config::GatekeepConfig,
    error::{ConfigError, GateError},
    request::VerificationRequest,
};

#[async_trait]
pub trait Verifier: Send + Sync {
    /// Issue a single verification request.
    ///
    /// Returns the HTTP status the service answered with. The body is never
    /// inspected.
    ///
    /// # Errors
    /// Returns [`GateError::Transport`] if no response was received.
    async fn verify(&self, request: &VerificationRequest) -> Result<u16, GateError>;
}

/// [`Verifier`] posting JSON to the thread search endpoint over HTTP(S).
///
/// Cloning is cheap and clones share a connection pool.
#[derive(Debug, Clone)]
pub struct HttpVerifier {
    client: Client,
    endpoint: Url,
}

impl HttpVerifier {
    /// Build a verifier from a validated configuration.
    ///
    /// # Errors
    /// Returns an error if the endpoint cannot be derived from the
    /// configured `uri`, or the HTTP client cannot be built.
    pub fn new(config: &GatekeepConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_client(client, config.endpoint()?))
    }

    /// Use an existing client, e.g. one shared with other hooks.
    pub const fn with_client(client: Client, endpoint: Url) -> Self {
        Self { client, endpoint }
    }

    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Verifier for HttpVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<u16, GateError> {
        outgoing!(
            "POST {} emailMessageId={}",
            self.endpoint,
            request.email_message_id()
        );

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(request)
            .send()
            .await
            .inspect_err(|err| incoming!(level = DEBUG, "POST {} failed: {err}", self.endpoint))?;

        let status = response.status().as_u16();
        incoming!("{status} from {}", self.endpoint);

        Ok(status)
    }
}
