//! Intro popup preference.
//!
//! Whether the first-visit popup should be shown is decided from a cookie;
//! dismissing it sets that cookie.

use axum::extract::State;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use invitewiz_core::intro::{intro_seen, intro_seen_cookie};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct IntroStatus {
    pub show: bool,
    /// Seconds to wait before showing the popup.
    pub delay_secs: u64,
}

/// GET /intro
pub async fn get_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<impl IntoResponse> {
    let cookie = headers.get(COOKIE).and_then(|v| v.to_str().ok());
    Ok(Json(DataResponse {
        data: IntroStatus {
            show: !intro_seen(cookie),
            delay_secs: state.config.intro_popup_delay_secs,
        },
    }))
}

/// POST /intro/dismiss
pub async fn dismiss(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    Ok((
        [(SET_COOKIE, intro_seen_cookie())],
        Json(DataResponse {
            data: IntroStatus {
                show: false,
                delay_secs: state.config.intro_popup_delay_secs,
            },
        }),
    ))
}
