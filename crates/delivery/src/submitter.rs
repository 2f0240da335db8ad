use async_trait::async_trait;
use invitewiz_core::submission::RelayPayload;

use crate::relay::RelayError;

/// Sends a finished order somewhere a human will read it.
///
/// Implemented by [`crate::RelayClient`] in production; tests substitute
/// an in-memory recorder.
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, payload: &RelayPayload) -> Result<(), RelayError>;
}
