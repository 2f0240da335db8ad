//! Color palette codec.
//!
//! A palette travels through the form as a single string:
//! `sourceTag####aabbcc,#112233###Display Name`. The source tag records
//! where the colors came from (a preset, hand-picked, or extracted from an
//! uploaded image).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Separator between the three palette segments.
pub const SEGMENT_SEPARATOR: &str = "###";

/// Maximum number of colors in a palette.
pub const MAX_PALETTE_COLORS: usize = 6;

fn hex_color_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color regex is valid")
    })
}

// ---------------------------------------------------------------------------
// PaletteSource
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSource {
    Preset,
    Custom,
    Image,
}

impl PaletteSource {
    pub fn from_tag(tag: &str) -> Result<Self, CoreError> {
        match tag {
            "preset" => Ok(Self::Preset),
            "custom" => Ok(Self::Custom),
            "image" => Ok(Self::Image),
            _ => Err(CoreError::Validation(format!(
                "Invalid palette source '{tag}'. Must be one of: preset, custom, image"
            ))),
        }
    }

    pub fn as_tag(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Custom => "custom",
            Self::Image => "image",
        }
    }
}

// ---------------------------------------------------------------------------
// ColorPalette
// ---------------------------------------------------------------------------

/// A decoded palette. Colors are always lowercase `#rrggbb`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPalette {
    pub source: PaletteSource,
    pub colors: Vec<String>,
    pub name: String,
}

impl ColorPalette {
    /// Build a palette, normalising and validating every color.
    pub fn new(
        source: PaletteSource,
        colors: &[&str],
        name: impl Into<String>,
    ) -> Result<Self, CoreError> {
        if colors.is_empty() {
            return Err(CoreError::Validation(
                "A color palette needs at least one color".to_string(),
            ));
        }
        if colors.len() > MAX_PALETTE_COLORS {
            return Err(CoreError::Validation(format!(
                "A color palette can hold at most {MAX_PALETTE_COLORS} colors, got {}",
                colors.len()
            )));
        }
        let colors = colors
            .iter()
            .map(|c| normalize_hex(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            source,
            colors,
            name: name.into().trim().to_string(),
        })
    }

    /// Parse the `###`-delimited form.
    pub fn decode(encoded: &str) -> Result<Self, CoreError> {
        let segments: Vec<&str> = encoded.split(SEGMENT_SEPARATOR).collect();
        if segments.len() != 3 {
            return Err(CoreError::Validation(format!(
                "Color palette must have 3 '{SEGMENT_SEPARATOR}'-separated segments, got {}",
                segments.len()
            )));
        }
        let source = PaletteSource::from_tag(segments[0].trim())?;
        let colors: Vec<&str> = segments[1]
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        Self::new(source, &colors, segments[2])
    }

    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.source.as_tag(),
            self.colors.join(","),
            self.name,
            sep = SEGMENT_SEPARATOR
        )
    }

    /// Name for display, falling back to the source when unnamed.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            match self.source {
                PaletteSource::Preset => "Preset palette",
                PaletteSource::Custom => "Custom palette",
                PaletteSource::Image => "Palette from image",
            }
        } else {
            &self.name
        }
    }
}

/// Normalise `#RGB` / `#RRGGBB` to lowercase `#rrggbb`.
pub fn normalize_hex(color: &str) -> Result<String, CoreError> {
    let color = color.trim();
    if !hex_color_re().is_match(color) {
        return Err(CoreError::Validation(format!(
            "Invalid color '{color}'. Expected #RGB or #RRGGBB"
        )));
    }
    let digits = &color[1..];
    let expanded: String = if digits.len() == 3 {
        digits.chars().flat_map(|c| [c, c]).collect()
    } else {
        digits.to_string()
    };
    Ok(format!("#{}", expanded.to_ascii_lowercase()))
}

/// Parse a normalised `#rrggbb` into RGB components.
pub fn hex_to_rgb(color: &str) -> Result<(u8, u8, u8), CoreError> {
    let normalized = normalize_hex(color)?;
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&normalized[range], 16)
            .map_err(|e| CoreError::Internal(format!("hex channel parse failed: {e}")))
    };
    Ok((channel(1..3)?, channel(3..5)?, channel(5..7)?))
}

// ---------------------------------------------------------------------------
// Presets
// ---------------------------------------------------------------------------

const PRESETS: &[(&str, &[&str])] = &[
    ("Blush Garden", &["#f7d6e0", "#f2b5d4", "#eff7f6", "#7bdff2", "#b2f7ef"]),
    ("Golden Hour", &["#fff1d0", "#f0c808", "#dd1c1a", "#086788"]),
    ("Sage & Cream", &["#f5f1e6", "#cdd5ae", "#9caf88", "#5f7161"]),
    ("Midnight Gala", &["#0b132b", "#1c2541", "#3a506b", "#c9a227"]),
    ("Candy Pop", &["#ff99c8", "#fcf6bd", "#d0f4de", "#a9def9", "#e4c1f9"]),
    ("Ocean Breeze", &["#e0fbfc", "#c2dfe3", "#9db4c0", "#5c6b73", "#253237"]),
];

/// The fixed catalog of preset palettes offered by the palette step.
pub fn preset_palettes() -> Vec<ColorPalette> {
    PRESETS
        .iter()
        .map(|(name, colors)| ColorPalette {
            source: PaletteSource::Preset,
            colors: colors.iter().map(|c| c.to_string()).collect(),
            name: (*name).to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
