use std::env;

use lazy_static::lazy_static;
use log::warn;

use crate::color::HexColor;

lazy_static! {
    static ref DEFAULT_PRESETS: Vec<HexColor> = parse_color_list(
        "#FF6900,#FCB900,#7BDCB5,#00D084,#8ED1FC,#0693E3,#ABB8C3,#EB144C,#F78DA7,#9900EF"
    );
}

const DEFAULT_BASE_COLOR: HexColor = HexColor::new(0xff, 0x00, 0x00);

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub public_origin: String,
    pub default_base_color: HexColor,
    pub preset_colors: Vec<HexColor>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            // Server
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            public_origin: lookup("PUBLIC_ORIGIN")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            // Picker
            default_base_color: lookup("DEFAULT_BASE_COLOR")
                .and_then(|v| match HexColor::parse(&v) {
                    Ok(color) => Some(color),
                    Err(e) => {
                        warn!("Ignoring DEFAULT_BASE_COLOR: {}", e);
                        None
                    }
                })
                .unwrap_or(DEFAULT_BASE_COLOR),
            preset_colors: lookup("PRESET_COLORS")
                .map(|v| parse_color_list(&v))
                .unwrap_or_else(|| DEFAULT_PRESETS.clone()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_color_list(list: &str) -> Vec<HexColor> {
    list.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match HexColor::parse(entry) {
            Ok(color) => Some(color),
            Err(e) => {
                warn!("Skipping preset color: {}", e);
                None
            }
        })
        .collect()
}
