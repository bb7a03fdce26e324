//! Business logic and service layer modules.
//!
//! Pure reply logic (units, formatting, location resolution), the reply
//! dispatcher, and the HTTP gateways it talks to.

pub mod dispatcher;
pub mod formatter;
pub mod http_client;
pub mod location;
pub mod metrics;
pub mod speech;
pub mod telegram;
pub mod units;
pub mod weather;

pub use dispatcher::*;
pub use formatter::*;
pub use http_client::*;
pub use location::*;
pub use metrics::*;
pub use speech::*;
pub use telegram::*;
pub use units::*;
pub use weather::*;
