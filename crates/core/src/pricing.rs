//! Order pricing.
//!
//! Each selected delivery format contributes its own base price; the
//! deadline window then adds a surcharge or subtracts a discount once for
//! the whole order. This is the only place these constants live.

use chrono::NaiveDate;
use serde::Serialize;

use crate::deadline::DeadlineWindow;
use crate::order::{Character, DeliveryFormat, OrderForm};
use crate::types::Dollars;

// ---------------------------------------------------------------------------
// Base prices
// ---------------------------------------------------------------------------

/// Animated video with no characters.
pub const VIDEO_BASE_PRICE: Dollars = 150;
/// Added to the video price for each character whose face is shown.
pub const FACE_CHARACTER_INCREMENT: Dollars = 40;
/// Added to the video price for each character drawn without a face.
pub const NO_FACE_CHARACTER_INCREMENT: Dollars = 25;

/// Still image price by character count (index = count, last tier is open-ended).
pub const STILL_IMAGE_TIERS: [Dollars; 5] = [60, 80, 95, 110, 125];

/// Fixed logo price.
pub const LOGO_PRICE: Dollars = 90;

// ---------------------------------------------------------------------------
// Per-format pricing
// ---------------------------------------------------------------------------

/// Video price for the given characters.
pub fn video_price(characters: &[Character]) -> Dollars {
    characters.iter().fold(VIDEO_BASE_PRICE, |acc, c| {
        acc + if c.show_face {
            FACE_CHARACTER_INCREMENT
        } else {
            NO_FACE_CHARACTER_INCREMENT
        }
    })
}

/// Still image tier for the given character count.
pub fn still_image_price(character_count: usize) -> Dollars {
    let tier = character_count.min(STILL_IMAGE_TIERS.len() - 1);
    STILL_IMAGE_TIERS[tier]
}

/// Base price of a single format for the given characters.
pub fn format_base_price(format: DeliveryFormat, characters: &[Character]) -> Dollars {
    match format {
        DeliveryFormat::Video => video_price(characters),
        DeliveryFormat::StillImage => still_image_price(characters.len()),
        DeliveryFormat::Logo => LOGO_PRICE,
    }
}

// ---------------------------------------------------------------------------
// Quote
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteLine {
    pub format: DeliveryFormat,
    pub label: &'static str,
    pub amount: Dollars,
}

/// Full price breakdown for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub line_items: Vec<QuoteLine>,
    pub subtotal: Dollars,
    /// `None` until a deadline is chosen.
    pub deadline_window: Option<DeadlineWindow>,
    pub adjustment: Dollars,
    pub total: Dollars,
    /// e.g. `"$185"`.
    pub price_display: String,
    /// e.g. `"Urgent delivery (+$30)"`; `None` when nothing is adjusted.
    pub adjustment_label: Option<String>,
}

/// Price an order as of `today`.
pub fn calculate_price(form: &OrderForm, today: NaiveDate) -> Quote {
    let characters = form.priced_characters();

    let mut formats = form.delivery_formats.clone();
    formats.sort();
    formats.dedup();

    let line_items: Vec<QuoteLine> = formats
        .into_iter()
        .map(|format| QuoteLine {
            format,
            label: format.label(),
            amount: format_base_price(format, &characters),
        })
        .collect();
    let subtotal: Dollars = line_items.iter().map(|l| l.amount).sum();

    let deadline_window = form
        .deadline
        .map(|deadline| DeadlineWindow::for_deadline(today, deadline));
    let adjustment = deadline_window.map_or(0, DeadlineWindow::price_modifier);
    let total = (subtotal + adjustment).max(0);

    let adjustment_label = deadline_window
        .filter(|_| adjustment != 0)
        .map(|w| format!("{} ({})", w.label(), format_signed(adjustment)));

    Quote {
        line_items,
        subtotal,
        deadline_window,
        adjustment,
        total,
        price_display: format_price(total),
        adjustment_label,
    }
}

/// Render whole dollars, e.g. `$185` or `-$15`.
pub fn format_price(amount: Dollars) -> String {
    if amount < 0 {
        format!("-${}", amount.unsigned_abs())
    } else {
        format!("${amount}")
    }
}

/// Render an adjustment with an explicit sign, e.g. `+$30`.
pub fn format_signed(amount: Dollars) -> String {
    if amount > 0 {
        format!("+{}", format_price(amount))
    } else {
        format_price(amount)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
