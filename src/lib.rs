//! Palette generation around a base color: RGB/HSL conversion, jittered hue rotation,
//! and the share link / export document built from the result.

pub mod api;
pub mod color;
pub mod config;
pub mod error;
pub mod palette;
pub mod share;
pub mod state;
pub mod templates;

pub use color::{hex_to_hsl, hsl_to_hex, HexColor, Hsl};
pub use error::{ColorError, ShareError};
pub use palette::{generate_palette, FixedJitter, Jitter, JitterSource, Palette, RandomJitter, PALETTE_SIZE};
pub use state::AppState;
