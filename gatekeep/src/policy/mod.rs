//! Policy abstractions for the verification gate.
//!
//! - [`RetryPolicy`]: how many attempts a decision may make, and how long to
//!   wait between them
//! - [`RetryBudget`]: the per-decision counter the policy hands out
//! - [`Transition`]: the pure step function driving a decision

pub mod retry;

pub use retry::{RetryBudget, RetryPolicy, Transition};
