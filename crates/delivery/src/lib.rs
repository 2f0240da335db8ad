//! Outbound delivery of submitted orders.
//!
//! - [`OrderSubmitter`]: the seam the API submits through.
//! - [`RelayClient`]: posts the order e-mail to the third-party form relay.
//! - [`RelayConfig`]: relay endpoint and credentials from the environment.

pub mod relay;
pub mod submitter;

pub use relay::{RelayClient, RelayConfig, RelayError};
pub use submitter::OrderSubmitter;
