//! Mounted at `/intro`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::intro;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(intro::get_status))
        .route("/dismiss", post(intro::dismiss))
}
