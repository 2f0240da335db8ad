//! Route definitions for order wizard sessions.
//!
//! Mounted at `/order-sessions` by `api_routes()`.
//!
//! ```text
//! POST   /                   create_session
//! GET    /{id}               get_session
//! PUT    /{id}/answers       update_answers
//! POST   /{id}/advance       advance_step
//! POST   /{id}/go-back       go_back
//! POST   /{id}/go-to         go_to_step
//! POST   /{id}/reset         reset_session
//! GET    /{id}/quote         get_quote
//! GET    /{id}/review        get_review
//! GET    /{id}/document      get_document (?format=pdf|data_uri)
//! POST   /{id}/submit        submit_order
//! ```

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::order_session;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(order_session::create_session))
        .route("/{id}", get(order_session::get_session))
        .route("/{id}/answers", put(order_session::update_answers))
        .route("/{id}/advance", post(order_session::advance_step))
        .route("/{id}/go-back", post(order_session::go_back))
        .route("/{id}/go-to", post(order_session::go_to_step))
        .route("/{id}/reset", post(order_session::reset_session))
        .route("/{id}/quote", get(order_session::get_quote))
        .route("/{id}/review", get(order_session::get_review))
        .route("/{id}/document", get(order_session::get_document))
        .route("/{id}/submit", post(order_session::submit_order))
}
