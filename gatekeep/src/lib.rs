//! Reply-reference verification for inbound mail.
//!
//! Inbound messages are only accepted when they reply to something we sent.
//! The `In-Reply-To` header is looked up against a verification service; a
//! 200 lets the message through, anything else rejects it. Transport
//! failures and 5xx answers are retried a fixed number of times with a
//! fixed delay before giving up.
//!
//! ```no_run
//! # async fn example() -> Result<(), gatekeep::error::ConfigError> {
//! use gatekeep::{config::GatekeepConfig, hook::{Directive, Gatekeep}};
//! use gatekeep_common::context::Context;
//!
//! let hook = Gatekeep::from_config(&GatekeepConfig::new("http://backend:8080"))?;
//! let mut context = Context::new("1").with_header("In-Reply-To", "<thread@example.org>");
//!
//! if hook.data_post(&mut context).await == Directive::Deny {
//!     // reject with context.response
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod gate;
pub mod hook;
pub mod policy;
pub mod request;
pub mod token;
pub mod verifier;

pub use config::GatekeepConfig;
pub use gate::{Outcome, VerifyingGate};
pub use hook::{Directive, Gatekeep};
