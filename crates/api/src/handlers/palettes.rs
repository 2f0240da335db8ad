//! Color palette catalog and decoding.

use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use invitewiz_core::error::CoreError;
use invitewiz_core::palette::{hex_to_rgb, preset_palettes, ColorPalette};

use crate::error::AppResult;
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
pub struct DecodePaletteRequest {
    /// `source###colors###name` string as stored in the answers.
    pub value: String,
}

/// A palette together with its stored form and RGB swatches.
#[derive(Debug, Serialize)]
pub struct PaletteView {
    #[serde(flatten)]
    pub palette: ColorPalette,
    pub display_name: String,
    pub encoded: String,
    pub rgb: Vec<[u8; 3]>,
}

impl PaletteView {
    fn build(palette: ColorPalette) -> Result<Self, CoreError> {
        let rgb = palette
            .colors
            .iter()
            .map(|c| hex_to_rgb(c).map(|(r, g, b)| [r, g, b]))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            display_name: palette.display_name().to_string(),
            encoded: palette.encode(),
            rgb,
            palette,
        })
    }
}

/// GET /palettes -- the preset catalog.
pub async fn list_presets() -> AppResult<impl IntoResponse> {
    let palettes = preset_palettes()
        .into_iter()
        .map(PaletteView::build)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DataResponse { data: palettes }))
}

/// POST /palettes/decode
pub async fn decode(Json(body): Json<DecodePaletteRequest>) -> AppResult<impl IntoResponse> {
    let palette = ColorPalette::decode(&body.value)?;
    Ok(Json(DataResponse {
        data: PaletteView::build(palette)?,
    }))
}
