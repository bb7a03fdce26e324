//! Configuration structures and loading utilities.
//!
//! Every structure loads from environment variables with `from_env()` and
//! falls back to its `Default`.

pub mod bot;
pub mod http_client;
pub mod metrics;
pub mod server;

pub use bot::*;
pub use metrics::*;
pub use server::*;
