//! Deadline windows and the booking calendar.
//!
//! The number of whole days between "today" and the requested deadline
//! decides whether an order pays the urgent surcharge, qualifies for an
//! early-booking discount, or is priced normally. Booked dates come from a
//! fixed arithmetic rule over the calendar date, so the same date always
//! reports the same availability.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Dollars;

// ---------------------------------------------------------------------------
// Window boundaries (inclusive, in days from today)
// ---------------------------------------------------------------------------

/// First day of the urgent window.
pub const URGENT_FROM_DAYS: i64 = 10;
/// Last day of the urgent window.
pub const URGENT_TO_DAYS: i64 = 18;
/// First day of the early-booking discount window.
pub const EARLY_BOOKING_FROM_DAYS: i64 = 40;
/// First day of the extended-booking discount window (open-ended).
pub const EXTENDED_BOOKING_FROM_DAYS: i64 = 70;

/// Surcharge for an urgent deadline.
pub const URGENT_SURCHARGE: Dollars = 30;
/// Discount for a deadline 40 to 69 days out.
pub const EARLY_BOOKING_DISCOUNT: Dollars = 15;
/// Discount for a deadline 70 or more days out.
pub const EXTENDED_BOOKING_DISCOUNT: Dollars = 25;

/// Earliest deadline that can be selected.
pub const MIN_LEAD_DAYS: i64 = URGENT_FROM_DAYS;
/// Latest deadline that can be selected.
pub const MAX_LEAD_DAYS: i64 = 365;

/// Signed number of whole days from `today` to `deadline`.
pub fn days_until(today: NaiveDate, deadline: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

// ---------------------------------------------------------------------------
// DeadlineWindow
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineWindow {
    Urgent,
    Regular,
    EarlyBooking,
    ExtendedBooking,
}

impl DeadlineWindow {
    /// Classify a day count into its pricing window.
    pub fn classify(days: i64) -> Self {
        if (URGENT_FROM_DAYS..=URGENT_TO_DAYS).contains(&days) {
            Self::Urgent
        } else if days >= EXTENDED_BOOKING_FROM_DAYS {
            Self::ExtendedBooking
        } else if days >= EARLY_BOOKING_FROM_DAYS {
            Self::EarlyBooking
        } else {
            Self::Regular
        }
    }

    /// Classify a concrete deadline relative to today.
    pub fn for_deadline(today: NaiveDate, deadline: NaiveDate) -> Self {
        Self::classify(days_until(today, deadline))
    }

    /// Price change applied by this window (positive for a surcharge).
    pub fn price_modifier(self) -> Dollars {
        match self {
            Self::Urgent => URGENT_SURCHARGE,
            Self::Regular => 0,
            Self::EarlyBooking => -EARLY_BOOKING_DISCOUNT,
            Self::ExtendedBooking => -EXTENDED_BOOKING_DISCOUNT,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Urgent => "Urgent delivery",
            Self::Regular => "Regular delivery",
            Self::EarlyBooking => "Early booking discount",
            Self::ExtendedBooking => "Extended booking discount",
        }
    }
}

// ---------------------------------------------------------------------------
// Booking rule
// ---------------------------------------------------------------------------

/// Whether the studio is already booked on `date`.
///
/// Not backed by a real calendar: `(day + 3 * month + year % 100) % 5 == 0`.
pub fn is_booked(date: NaiveDate) -> bool {
    let day = date.day() as i64;
    let month = date.month() as i64;
    let year = date.year() as i64;
    (day + 3 * month + year.rem_euclid(100)) % 5 == 0
}

/// Check that `deadline` can be chosen on `today`.
pub fn validate_deadline(today: NaiveDate, deadline: NaiveDate) -> Result<(), CoreError> {
    let days = days_until(today, deadline);
    if days < MIN_LEAD_DAYS {
        return Err(CoreError::Validation(format!(
            "The deadline must be at least {MIN_LEAD_DAYS} days from today ({days} selected)"
        )));
    }
    if days > MAX_LEAD_DAYS {
        return Err(CoreError::Validation(format!(
            "The deadline must be within {MAX_LEAD_DAYS} days from today ({days} selected)"
        )));
    }
    if is_booked(deadline) {
        return Err(CoreError::Validation(format!(
            "{deadline} is fully booked, please choose another date"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Month calendar
// ---------------------------------------------------------------------------

/// Availability of a single calendar day.
#[derive(Debug, Clone, Serialize)]
pub struct DayAvailability {
    pub date: NaiveDate,
    pub days_out: i64,
    pub booked: bool,
    pub selectable: bool,
    pub window: DeadlineWindow,
}

/// Availability for every day of `year`-`month`, relative to `today`.
pub fn month_availability(
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Result<Vec<DayAvailability>, CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        CoreError::Validation(format!("Invalid calendar month {year}-{month:02}"))
    })?;

    let days = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|date| {
            let days_out = days_until(today, date);
            let booked = is_booked(date);
            DayAvailability {
                date,
                days_out,
                booked,
                selectable: validate_deadline(today, date).is_ok(),
                window: DeadlineWindow::classify(days_out),
            }
        })
        .collect();
    Ok(days)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
