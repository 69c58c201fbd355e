use rand::Rng;
use serde::Serialize;
use log::warn;

use crate::color::{hex_to_hsl, hsl_to_hex, HexColor, Hsl};

/// Number of swatches in a generated palette.
pub const PALETTE_SIZE: usize = 5;
/// Nominal hue rotation between consecutive swatches, in degrees.
pub const HUE_STEP: f64 = 30.0;
pub const HUE_JITTER: f64 = 15.0;
pub const SATURATION_JITTER: f64 = 10.0;
pub const LIGHTNESS_JITTER: f64 = 10.0;

/// Offsets applied to one swatch, in degrees and percentage points.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Jitter {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Jitter {
    pub fn new(hue: f64, saturation: f64, lightness: f64) -> Self {
        Self { hue, saturation, lightness }
    }
}

/// Where palette generation draws its per-swatch offsets from.
pub trait JitterSource {
    fn next_jitter(&mut self) -> Jitter;
}

/// Uniform draws: hue in `[-15, 15)`, saturation and lightness in `[-10, 10)`.
pub struct RandomJitter<R> {
    rng: R,
}

impl<R: Rng> RandomJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomJitter<rand::rngs::ThreadRng> {
    pub fn thread_local() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> JitterSource for RandomJitter<R> {
    fn next_jitter(&mut self) -> Jitter {
        Jitter {
            hue: self.rng.random_range(-HUE_JITTER..HUE_JITTER),
            saturation: self.rng.random_range(-SATURATION_JITTER..SATURATION_JITTER),
            lightness: self.rng.random_range(-LIGHTNESS_JITTER..LIGHTNESS_JITTER),
        }
    }
}

/// Replays a fixed list of offsets, cycling when it runs out. An empty list yields no offset.
#[derive(Debug, Clone, Default)]
pub struct FixedJitter {
    values: Vec<Jitter>,
    next: usize,
}

impl FixedJitter {
    pub fn new(values: Vec<Jitter>) -> Self {
        Self { values, next: 0 }
    }
}

impl JitterSource for FixedJitter {
    fn next_jitter(&mut self) -> Jitter {
        if self.values.is_empty() {
            return Jitter::default();
        }
        let jitter = self.values[self.next % self.values.len()];
        self.next += 1;
        jitter
    }
}

/// Ordered swatches. Index 0 sits next to the base color, each following one is rotated further.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette(Vec<HexColor>);

impl Palette {
    pub fn new(colors: Vec<HexColor>) -> Self {
        Self(colors)
    }

    pub fn colors(&self) -> &[HexColor] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HexColor> {
        self.0.iter()
    }

    /// Comma-separated hex colors, e.g. `#ff0000,#00ff00`.
    pub fn to_query_value(&self) -> String {
        self.0.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(",")
    }

    /// Inverse of [`Palette::to_query_value`]. Blank input is an empty palette;
    /// entries that are not hex colors are dropped.
    pub fn from_query_value(value: &str) -> Self {
        let colors = value
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match HexColor::parse(entry) {
                Ok(color) => Some(color),
                Err(e) => {
                    warn!("Skipping palette entry: {}", e);
                    None
                }
            })
            .collect();
        Self(colors)
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a HexColor;
    type IntoIter = std::slice::Iter<'a, HexColor>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Derives five colors from `base`: hue rotated by `i * 30` degrees plus jitter,
/// saturation and lightness jittered and clamped to `[0, 100]`.
pub fn generate_palette<J: JitterSource + ?Sized>(base: HexColor, jitter: &mut J) -> Palette {
    let hsl = hex_to_hsl(base);
    let colors = (0..PALETTE_SIZE)
        .map(|i| {
            let offset = jitter.next_jitter();
            let h = (hsl.h + i as f64 * HUE_STEP + offset.hue).rem_euclid(360.0);
            let s = (hsl.s + offset.saturation).clamp(0.0, 100.0);
            let l = (hsl.l + offset.lightness).clamp(0.0, 100.0);
            hsl_to_hex(Hsl::new(h, s, l))
        })
        .collect();
    Palette(colors)
}
