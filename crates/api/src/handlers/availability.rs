//! Booking calendar.

use axum::extract::Query;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use invitewiz_core::deadline::{month_availability, DayAvailability, MAX_LEAD_DAYS, MIN_LEAD_DAYS};

use crate::error::AppResult;
use crate::handlers::today;
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
pub struct AvailabilityParams {
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Serialize)]
pub struct MonthAvailability {
    pub year: i32,
    pub month: u32,
    pub min_lead_days: i64,
    pub max_lead_days: i64,
    pub days: Vec<DayAvailability>,
}

/// GET /availability?year=&month=
pub async fn get_month(Query(params): Query<AvailabilityParams>) -> AppResult<impl IntoResponse> {
    let days = month_availability(params.year, params.month, today())?;
    Ok(Json(DataResponse {
        data: MonthAvailability {
            year: params.year,
            month: params.month,
            min_lead_days: MIN_LEAD_DAYS,
            max_lead_days: MAX_LEAD_DAYS,
            days,
        },
    }))
}
