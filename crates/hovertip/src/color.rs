#![forbid(unsafe_code)]

//! Hex colour parsing and translucent tint resolution.

use std::fmt;

/// Opaque sRGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach an alpha channel, clamped to `[0, 1]`.
    #[must_use]
    pub fn with_alpha(self, alpha: f32) -> Rgba {
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a: clamp_unit(alpha, 1.0),
        }
    }
}

/// sRGB colour with a floating alpha, as used by CSS `rgba()`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    /// CSS functional notation, e.g. `rgba(0, 0, 0, 0.4)`.
    #[must_use]
    pub fn to_css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Why a colour string was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorError {
    /// Not 3 or 6 hex digits after the optional `#`.
    BadLength(usize),
    /// A character outside `[0-9a-fA-F]`.
    BadDigit(char),
}

impl fmt::Display for ColorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength(n) => write!(f, "expected 3 or 6 hex digits, got {n}"),
            Self::BadDigit(c) => write!(f, "invalid hex digit {c:?}"),
        }
    }
}

impl std::error::Error for ColorError {}

/// Parse `#rgb`, `#rrggbb`, `rgb`, or `rrggbb`.
pub fn parse_hex(input: &str) -> Result<Rgb, ColorError> {
    let s = input.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    let mut digits = [0u8; 6];
    let mut n = 0;
    for c in s.chars() {
        let d = c.to_digit(16).ok_or(ColorError::BadDigit(c))? as u8;
        if n < digits.len() {
            digits[n] = d;
        }
        n += 1;
    }

    match n {
        3 => Ok(Rgb::new(
            digits[0] * 17,
            digits[1] * 17,
            digits[2] * 17,
        )),
        6 => Ok(Rgb::new(
            (digits[0] << 4) | digits[1],
            (digits[2] << 4) | digits[3],
            (digits[4] << 4) | digits[5],
        )),
        other => Err(ColorError::BadLength(other)),
    }
}

/// Background tint for text tooltips.
///
/// No colour means black. An unparsable colour is logged and treated as black.
#[must_use]
pub fn resolve_tint(color: Option<&str>, opacity: f32) -> Rgba {
    let base = match color {
        None => Rgb::default(),
        Some(c) => match parse_hex(c) {
            Ok(rgb) => rgb,
            Err(err) => {
                hovertip_core::warn!(color = c, %err, "invalid tooltip colour, using black");
                Rgb::default()
            }
        },
    };
    base.with_alpha(opacity)
}

/// Clamp into `[0, 1]`; non-finite input becomes `fallback`.
pub(crate) fn clamp_unit(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { fallback }
}
