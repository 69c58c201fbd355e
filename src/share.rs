use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::color::HexColor;
use crate::error::ShareError;
use crate::palette::Palette;

pub const SHARE_TITLE: &str = "Colorfly Palette";
pub const EXPORT_FILE_NAME: &str = "colorfly-palette.json";
pub const COLORS_PARAM: &str = "colors";

/// File written by the export action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaletteExport {
    pub colors: Vec<HexColor>,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

impl PaletteExport {
    pub fn new(palette: &Palette, at: DateTime<Utc>) -> Result<Self, ShareError> {
        if palette.is_empty() {
            return Err(ShareError::EmptyPalette);
        }
        Ok(Self {
            colors: palette.colors().to_vec(),
            timestamp: at.to_rfc3339_opts(SecondsFormat::Millis, true),
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// `<origin>/palette?colors=c1,c2,...` with the query value form-encoded.
pub fn share_url(origin: &str, palette: &Palette) -> Result<Url, ShareError> {
    if palette.is_empty() {
        return Err(ShareError::EmptyPalette);
    }
    let mut url = Url::parse(origin)?.join("/palette")?;
    url.query_pairs_mut().clear().append_pair(COLORS_PARAM, &palette.to_query_value());
    Ok(url)
}

pub fn share_text(palette: &Palette) -> String {
    let colors = palette.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ");
    format!("Check out this color palette: {}", colors)
}

/// Decodes a raw query string into its parameters. Later duplicates win.
pub fn query_params(query: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(query.as_bytes()).into_owned().collect()
}

/// Palette carried by the `colors` parameter; missing means empty.
pub fn parse_colors_param(params: &HashMap<String, String>) -> Palette {
    params
        .get(COLORS_PARAM)
        .map(|value| Palette::from_query_value(value))
        .unwrap_or_default()
}
