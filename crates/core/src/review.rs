//! Review summary shared by the review step, the PDF and the e-mail body.

use serde::Serialize;

use crate::palette::ColorPalette;
use crate::pricing::{format_price, Quote};
use crate::order::OrderForm;

/// Placeholder shown for unanswered fields.
pub const NOT_PROVIDED: &str = "Not provided";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    pub title: String,
    pub rows: Vec<ReviewRow>,
}

/// Ordered, display-ready view of an order and its price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSummary {
    pub customer_name: String,
    pub sections: Vec<ReviewSection>,
    /// Normalised `#rrggbb` swatches of the chosen palette, if any.
    pub palette_swatches: Vec<String>,
    pub total_display: String,
}

struct SectionBuilder {
    title: &'static str,
    rows: Vec<ReviewRow>,
}

impl SectionBuilder {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            rows: Vec::new(),
        }
    }

    fn row(mut self, label: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let value = if value.trim().is_empty() {
            NOT_PROVIDED.to_string()
        } else {
            value
        };
        self.rows.push(ReviewRow {
            label: label.to_string(),
            value,
        });
        self
    }

    fn build(self) -> ReviewSection {
        ReviewSection {
            title: self.title.to_string(),
            rows: self.rows,
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

impl ReviewSummary {
    pub fn build(form: &OrderForm, quote: &Quote) -> Self {
        let contact = SectionBuilder::new("Contact")
            .row("Name", form.name.trim())
            .row("Social handle", form.social_handle.clone().unwrap_or_default())
            .row("Email", form.email.trim())
            .build();

        let event = SectionBuilder::new("Event")
            .row("Occasion", form.occasion_display().unwrap_or_default())
            .row("Event date", form.event_date_text.trim())
            .row("Venue", form.venue.trim())
            .row("Invitation text", form.message.trim())
            .row("Notes", form.notes.trim())
            .build();

        let formats = form
            .delivery_formats
            .iter()
            .map(|f| f.label())
            .collect::<Vec<_>>()
            .join(", ");
        let delivery = SectionBuilder::new("Delivery").row("Formats", formats).build();

        let characters = if form.has_characters {
            let faces = form.characters.iter().filter(|c| c.show_face).count();
            SectionBuilder::new("Characters")
                .row("Included", "Yes")
                .row("Count", form.character_count.to_string())
                .row("Faces shown", format!("{faces} of {}", form.characters.len()))
                .build()
        } else {
            SectionBuilder::new("Characters")
                .row("Included", yes_no(false))
                .build()
        };

        let palette = form
            .color_palette
            .as_deref()
            .and_then(|p| ColorPalette::decode(p).ok());
        let animations = form
            .animation_styles
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", ");
        let design = SectionBuilder::new("Design")
            .row(
                "Color palette",
                palette
                    .as_ref()
                    .map(|p| format!("{} ({})", p.display_name(), p.colors.join(", ")))
                    .unwrap_or_default(),
            )
            .row("Animation styles", animations)
            .row(
                "Visual style",
                form.visual_style.map(|s| s.label()).unwrap_or_default(),
            )
            .build();

        let mut pricing = SectionBuilder::new("Deadline & price").row(
            "Deadline",
            form.deadline
                .map(|d| d.format("%B %-d, %Y").to_string())
                .unwrap_or_default(),
        );
        for line in &quote.line_items {
            pricing = pricing.row(line.label, format_price(line.amount));
        }
        if let Some(label) = &quote.adjustment_label {
            pricing = pricing.row("Adjustment", label.clone());
        }
        let pricing = pricing.row("Total", quote.price_display.clone()).build();

        Self {
            customer_name: form.name.trim().to_string(),
            sections: vec![contact, event, delivery, characters, design, pricing],
            palette_swatches: palette.map(|p| p.colors).unwrap_or_default(),
            total_display: quote.price_display.clone(),
        }
    }

    /// Plain-text rendering used for the e-mail body.
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        for section in &self.sections {
            out.push_str(&section.title.to_uppercase());
            out.push('\n');
            for row in &section.rows {
                out.push_str(&format!("  {}: {}\n", row.label, row.value));
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
