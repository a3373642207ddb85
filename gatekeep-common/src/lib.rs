pub mod context;
pub mod error;
pub mod logging;
pub mod status;

pub use tracing;
