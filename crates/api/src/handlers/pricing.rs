//! Stateless price quotes.

use axum::response::IntoResponse;
use axum::Json;

use invitewiz_core::error::CoreError;
use invitewiz_core::order::{OrderForm, MAX_CHARACTERS};
use invitewiz_core::pricing::calculate_price;

use crate::error::AppResult;
use crate::handlers::today;
use crate::response::DataResponse;

/// POST /pricing/quote -- price an arbitrary set of answers.
///
/// `character_count` decides how many characters are priced; a shorter
/// `characters` list is padded with the `show_faces` default.
pub async fn quote(Json(form): Json<OrderForm>) -> AppResult<impl IntoResponse> {
    if form.has_characters && form.character_count > MAX_CHARACTERS {
        return Err(CoreError::Validation(format!(
            "At most {MAX_CHARACTERS} characters can be included, got {}",
            form.character_count
        ))
        .into());
    }
    let quote = calculate_price(&form, today());
    Ok(Json(DataResponse { data: quote }))
}
