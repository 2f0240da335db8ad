use std::sync::Arc;

use invitewiz_core::submission::RelaySettings;
use invitewiz_delivery::OrderSubmitter;

use crate::config::ServerConfig;
use crate::sessions::SessionStore;

/// Where submitted orders go and the settings stamped on each payload.
#[derive(Clone)]
pub struct OrderDelivery {
    pub submitter: Arc<dyn OrderSubmitter>,
    pub settings: RelaySettings,
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or already `Clone`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    /// In-memory wizard sessions.
    pub sessions: Arc<SessionStore>,
    /// `None` when no relay credentials are configured; submissions then fail with 503.
    pub delivery: Option<OrderDelivery>,
}
