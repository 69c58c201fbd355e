use chrono::{DateTime, Utc};
use log::debug;
use url::Url;

use crate::color::HexColor;
use crate::error::ShareError;
use crate::palette::{generate_palette, JitterSource, Palette};
use crate::share::{share_url, PaletteExport};

/// What one user is looking at: the selected base color and the last generated palette.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub base_color: HexColor,
    pub palette: Palette,
}

impl AppState {
    pub fn new(base_color: HexColor) -> Self {
        Self { base_color, palette: Palette::default() }
    }

    pub fn with_palette(base_color: HexColor, palette: Palette) -> Self {
        Self { base_color, palette }
    }

    /// Picking a new base keeps the current palette until the next generation.
    pub fn select_base(&mut self, color: HexColor) {
        self.base_color = color;
    }

    /// Replaces the palette; the previous one is gone.
    pub fn generate<J: JitterSource + ?Sized>(&mut self, jitter: &mut J) -> &Palette {
        self.palette = generate_palette(self.base_color, jitter);
        debug!("Generated palette from {}: {}", self.base_color, self.palette.to_query_value());
        &self.palette
    }

    pub fn has_palette(&self) -> bool {
        !self.palette.is_empty()
    }

    pub fn share_url(&self, origin: &str) -> Result<Url, ShareError> {
        share_url(origin, &self.palette)
    }

    pub fn export(&self, at: DateTime<Utc>) -> Result<PaletteExport, ShareError> {
        PaletteExport::new(&self.palette, at)
    }
}
