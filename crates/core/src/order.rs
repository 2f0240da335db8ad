//! The order record collected by the wizard.
//!
//! One [`OrderForm`] per session holds every answer as a flat record. The
//! catalogs of selectable values (occasions, delivery formats, animation
//! and visual styles) live here too so the pricing, review and wizard
//! modules share the same identifiers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum number of characters that can be drawn on one invitation.
pub const MAX_CHARACTERS: u8 = 6;

/// Maximum number of animation styles a customer may pick.
pub const MAX_ANIMATION_STYLES: usize = 3;

// ---------------------------------------------------------------------------
// Occasion
// ---------------------------------------------------------------------------

/// The event the invitation is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Occasion {
    Wedding,
    Birthday,
    BabyShower,
    Baptism,
    Anniversary,
    Graduation,
    Other,
}

impl Occasion {
    pub const ALL: [Occasion; 7] = [
        Self::Wedding,
        Self::Birthday,
        Self::BabyShower,
        Self::Baptism,
        Self::Anniversary,
        Self::Graduation,
        Self::Other,
    ];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Wedding => "Wedding",
            Self::Birthday => "Birthday",
            Self::BabyShower => "Baby shower",
            Self::Baptism => "Baptism",
            Self::Anniversary => "Anniversary",
            Self::Graduation => "Graduation",
            Self::Other => "Other",
        }
    }
}

// ---------------------------------------------------------------------------
// Delivery format
// ---------------------------------------------------------------------------

/// Deliverable type. Each format is priced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryFormat {
    Video,
    StillImage,
    Logo,
}

impl DeliveryFormat {
    pub fn label(self) -> &'static str {
        match self {
            Self::Video => "Animated video",
            Self::StillImage => "Still image",
            Self::Logo => "Logo",
        }
    }
}

// ---------------------------------------------------------------------------
// Animation and visual styles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationStyle {
    Confetti,
    FloatingHearts,
    Sparkles,
    PageTurn,
    Balloons,
    Fireworks,
    PetalFall,
    SlowZoom,
}

impl AnimationStyle {
    pub const ALL: [AnimationStyle; 8] = [
        Self::Confetti,
        Self::FloatingHearts,
        Self::Sparkles,
        Self::PageTurn,
        Self::Balloons,
        Self::Fireworks,
        Self::PetalFall,
        Self::SlowZoom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Confetti => "Confetti",
            Self::FloatingHearts => "Floating hearts",
            Self::Sparkles => "Sparkles",
            Self::PageTurn => "Page turn",
            Self::Balloons => "Balloons",
            Self::Fireworks => "Fireworks",
            Self::PetalFall => "Falling petals",
            Self::SlowZoom => "Slow zoom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualStyle {
    Watercolor,
    Minimalist,
    Floral,
    Cartoon,
    Elegant,
    Rustic,
    Playful,
}

impl VisualStyle {
    pub const ALL: [VisualStyle; 7] = [
        Self::Watercolor,
        Self::Minimalist,
        Self::Floral,
        Self::Cartoon,
        Self::Elegant,
        Self::Rustic,
        Self::Playful,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Watercolor => "Watercolor",
            Self::Minimalist => "Minimalist",
            Self::Floral => "Floral",
            Self::Cartoon => "Cartoon",
            Self::Elegant => "Elegant",
            Self::Rustic => "Rustic",
            Self::Playful => "Playful",
        }
    }
}

// ---------------------------------------------------------------------------
// Character
// ---------------------------------------------------------------------------

/// A character drawn on the invitation. Ids are 1-based positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u8,
    pub show_face: bool,
}

// ---------------------------------------------------------------------------
// OrderForm
// ---------------------------------------------------------------------------

/// Every answer collected by the wizard for one order.
///
/// `email` is only checked by [`Validate`] on the review step; earlier
/// steps validate their own fields explicitly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OrderForm {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 60))]
    pub social_handle: Option<String>,
    #[validate(email)]
    pub email: String,

    pub occasion: Option<Occasion>,
    pub occasion_other: Option<String>,

    pub delivery_formats: Vec<DeliveryFormat>,

    pub has_characters: bool,
    pub show_faces: bool,
    pub character_count: u8,
    pub characters: Vec<Character>,

    pub event_date_text: String,
    pub venue: String,
    pub message: String,
    pub notes: String,

    /// Encoded as `sourceTag###colors###displayName`, see [`crate::palette`].
    pub color_palette: Option<String>,
    pub animation_styles: Vec<AnimationStyle>,
    pub visual_style: Option<VisualStyle>,

    pub deadline: Option<NaiveDate>,

    pub submitted: bool,
}

impl OrderForm {
    /// Whether the given delivery format is selected.
    pub fn has_format(&self, format: DeliveryFormat) -> bool {
        self.delivery_formats.contains(&format)
    }

    /// Add the format if absent, remove it if present.
    pub fn toggle_format(&mut self, format: DeliveryFormat) {
        if let Some(pos) = self.delivery_formats.iter().position(|f| *f == format) {
            self.delivery_formats.remove(pos);
        } else {
            self.delivery_formats.push(format);
            self.delivery_formats.sort();
        }
    }

    /// Characters that count towards pricing. Empty when the customer
    /// opted out of characters, regardless of any stale list entries.
    pub fn priced_characters(&self) -> Vec<Character> {
        if !self.has_characters {
            return Vec::new();
        }
        // `character_count` is authoritative; missing entries take the face default.
        let count = self.character_count.min(MAX_CHARACTERS);
        (0..count)
            .map(|i| {
                self.characters
                    .get(i as usize)
                    .copied()
                    .unwrap_or(Character {
                        id: i + 1,
                        show_face: self.show_faces,
                    })
            })
            .collect()
    }

    /// Resize the character list, keeping existing entries.
    ///
    /// New characters get the next 1-based id and inherit `show_faces`.
    pub fn set_character_count(&mut self, count: u8) -> Result<(), CoreError> {
        if count > MAX_CHARACTERS {
            return Err(CoreError::Validation(format!(
                "At most {MAX_CHARACTERS} characters can be included, got {count}"
            )));
        }
        let target = count as usize;
        self.characters.truncate(target);
        while self.characters.len() < target {
            let id = self.characters.len() as u8 + 1;
            self.characters.push(Character {
                id,
                show_face: self.show_faces,
            });
        }
        self.character_count = count;
        Ok(())
    }

    /// Occasion text for display, using the free-text fallback for `Other`.
    pub fn occasion_display(&self) -> Option<String> {
        match self.occasion? {
            Occasion::Other => Some(
                self.occasion_other
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .unwrap_or(Occasion::Other.label())
                    .to_string(),
            ),
            other => Some(other.label().to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
