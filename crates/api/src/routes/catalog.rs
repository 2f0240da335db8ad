//! Stateless lookups: pricing, the booking calendar and palettes.
//!
//! ```text
//! POST   /pricing/quote      pricing::quote
//! GET    /availability       availability::get_month
//! GET    /palettes           palettes::list_presets
//! POST   /palettes/decode    palettes::decode
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{availability, palettes, pricing};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pricing/quote", post(pricing::quote))
        .route("/availability", get(availability::get_month))
        .route("/palettes", get(palettes::list_presets))
        .route("/palettes/decode", post(palettes::decode))
}
