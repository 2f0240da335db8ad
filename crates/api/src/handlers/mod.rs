pub mod availability;
pub mod intro;
pub mod order_session;
pub mod palettes;
pub mod pricing;

use chrono::{NaiveDate, Utc};

/// Calendar date all deadline arithmetic is relative to.
pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}
