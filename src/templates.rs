use askama::Template;

use crate::color::{hex_to_hsl, hsl_string, HexColor};
use crate::palette::Palette;

pub struct Swatch {
    pub hex: String,
    pub hsl: String,
}

impl Swatch {
    pub fn from_color(color: HexColor) -> Self {
        Self {
            hex: color.to_string(),
            hsl: hsl_string(hex_to_hsl(color)),
        }
    }

    pub fn from_palette(palette: &Palette) -> Vec<Self> {
        palette.iter().copied().map(Self::from_color).collect()
    }
}

pub struct PresetLink {
    pub hex: String,
    pub href: String,
    pub selected: bool,
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub base_color: String,
    pub presets: Vec<PresetLink>,
    pub swatches: Vec<Swatch>,
    pub has_palette: bool,
    pub share_url: String,
    pub share_text: String,
    pub export_href: String,
    pub export_file_name: &'static str,
}

#[derive(Template)]
#[template(path = "palette.html")]
pub struct SharedPaletteTemplate {
    pub title: &'static str,
    pub swatches: Vec<Swatch>,
}
