//! Colors, color constants and the random color source used to paint generated fields.
//!
//! Colors are linear RGBA with f32 components. Components usually lie in
//! [0.0, 1.0] but the renderer works in HDR, so emissive contributions may
//! push them above 1.0 before the bloom pass.
//!
//! 8-bit inputs (`from_rgb8`, `from_hex`, generated colors) are sRGB-encoded
//! and decoded to linear on construction, so they come back out of
//! [`linear_to_srgb8`] unchanged.

use rand::Rng;
pub use rgb::Rgba;

/// The color type used throughout glowfield. RGBA with f32 components.
pub type Color = Rgba<f32>;

/// <div style="margin:2px 0"><span style="background-color:rgb(0, 0, 0);padding:0 0.7em;margin-right:0.5em;border:1px solid"></span>Black (0, 0, 0)</div>
pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);

/// <div style="margin:2px 0"><span style="background-color:rgb(255, 255, 255);padding:0 0.7em;margin-right:0.5em;border:1px solid"></span>White (255, 255, 255)</div>
pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);

/// <div style="margin:2px 0"><span style="background-color:rgb(255, 0, 0);padding:0 0.7em;margin-right:0.5em;border:1px solid"></span>Red (255, 0, 0)</div>
pub const RED: Color = Color::new(1.0, 0.0, 0.0, 1.0);

/// <div style="margin:2px 0"><span style="background-color:rgb(1, 0, 3);padding:0 0.7em;margin-right:0.5em;border:1px solid"></span>Night (1, 0, 3) - the default clear color</div>
pub const NIGHT: Color = Color::new(0.000303527, 0.0, 0.000910581, 1.0);

/// <div style="margin:2px 0"><span style="background-color:rgb(38, 40, 55);padding:0 0.7em;margin-right:0.5em;border:1px solid"></span>Slate night (38, 40, 55)</div>
pub const SLATE_NIGHT: Color = Color::new(0.019382361, 0.02121901, 0.038204372, 1.0);

/// Builds an opaque linear color from 8-bit sRGB channels.
#[inline]
pub fn from_rgb8(r: u8, g: u8, b: u8) -> Color {
    Color::new(srgb8_to_linear(r), srgb8_to_linear(g), srgb8_to_linear(b), 1.0)
}

/// Decodes one 8-bit sRGB value to a linear channel. Inverse of [`linear_to_srgb8`].
#[inline]
pub fn srgb8_to_linear(v: u8) -> f32 {
    match v {
        0 => 0.0,
        u8::MAX => 1.0,
        _ => {
            let s = v as f32 / 255.0;
            if s <= 0.040_45 {
                s / 12.92
            } else {
                ((s + 0.055) / 1.055).powf(2.4)
            }
        }
    }
}

/// Parses `#rrggbb` (or `rrggbb`). Returns `None` on malformed input.
pub fn from_hex(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    Some(from_rgb8(channel(0)?, channel(2)?, channel(4)?))
}

/// Relative luminance (Rec. 709 weights) of the RGB part of `c`.
#[inline]
pub fn luminance(c: Color) -> f32 {
    0.2126 * c.r + 0.7152 * c.g + 0.0722 * c.b
}

/// Component-wise `a + b * k` on RGB, keeping the alpha of `a`.
#[inline]
pub fn add_scaled(a: Color, b: Color, k: f32) -> Color {
    Color::new(a.r + b.r * k, a.g + b.g * k, a.b + b.b * k, a.a)
}

/// Component-wise RGB scaling, keeping alpha.
#[inline]
pub fn scale(c: Color, k: f32) -> Color {
    Color::new(c.r * k, c.g * k, c.b * k, c.a)
}

/// Encodes one linear channel to an 8-bit sRGB value, clamping HDR values.
#[inline]
pub fn linear_to_srgb8(v: f32) -> u8 {
    let v = v.clamp(0.0, 1.0);
    let s = if v <= 0.003_130_8 {
        v * 12.92
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    };
    (s * 255.0 + 0.5) as u8
}

/// Per-channel inclusive bounds, in 8-bit units, for generated colors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ColorBounds {
    pub min_r: u8,
    pub max_r: u8,
    pub min_g: u8,
    pub max_g: u8,
    pub min_b: u8,
    pub max_b: u8,
}

impl Default for ColorBounds {
    fn default() -> Self {
        Self::uniform(0, 255)
    }
}

impl ColorBounds {
    /// Same `[min, max]` range on every channel.
    pub const fn uniform(min: u8, max: u8) -> Self {
        ColorBounds {
            min_r: min,
            max_r: max,
            min_g: min,
            max_g: max,
            min_b: min,
            max_b: max,
        }
    }

    /// The bounds used for sphere fields: mid-tones that stay visible
    /// against a dark background without saturating.
    pub const fn pastel() -> Self {
        Self::uniform(100, 200)
    }
}

/// Produces one random RGB color per call, within optional per-channel bounds.
///
/// Swapped min/max bounds are tolerated (they are reordered).
pub struct ColorGenerator {
    bounds: ColorBounds,
}

impl Default for ColorGenerator {
    fn default() -> Self {
        Self::new(ColorBounds::default())
    }
}

impl ColorGenerator {
    /// Creates a generator drawing inside `bounds`.
    pub fn new(bounds: ColorBounds) -> Self {
        ColorGenerator { bounds }
    }

    /// The configured bounds.
    pub fn bounds(&self) -> ColorBounds {
        self.bounds
    }

    /// Draws one opaque color.
    pub fn generate<R: Rng>(&self, rng: &mut R) -> Color {
        let b = &self.bounds;
        let mut channel = |lo: u8, hi: u8| {
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            rng.random_range(lo..=hi)
        };
        let r = channel(b.min_r, b.max_r);
        let g = channel(b.min_g, b.max_g);
        let bl = channel(b.min_b, b.max_b);
        from_rgb8(r, g, bl)
    }
}
