pub mod catalog;
pub mod health;
pub mod intro;
pub mod order_session;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /order-sessions                                  create
/// /order-sessions/{id}                             get
/// /order-sessions/{id}/answers                     replace answers (PUT)
/// /order-sessions/{id}/advance                     next step
/// /order-sessions/{id}/go-back                     previous step
/// /order-sessions/{id}/go-to                       jump to reached step
/// /order-sessions/{id}/reset                       clear answers
/// /order-sessions/{id}/quote                       price quote
/// /order-sessions/{id}/review                      review summary
/// /order-sessions/{id}/document                    PDF (?format=data_uri)
/// /order-sessions/{id}/submit                      send to form relay
///
/// /pricing/quote                                   stateless quote (POST)
/// /availability                                    booking calendar (?year, month)
/// /palettes                                        preset palettes
/// /palettes/decode                                 decode stored palette (POST)
///
/// /intro                                           intro popup status
/// /intro/dismiss                                   remember dismissal (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/order-sessions", order_session::router())
        .merge(catalog::router())
        .nest("/intro", intro::router())
}
