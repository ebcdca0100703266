// ============================================================================
// CELL COLOR — the one typed color value used everywhere inside the engine
// ============================================================================

use std::fmt;
use std::str::FromStr;

use image::Rgba;

use crate::error::EditorError;

/// Color held by a single grid cell.
///
/// `Empty` means fully transparent / unset. An RGBA value never carries a zero
/// alpha: [`CellColor::rgba`] folds that case into `Empty` so palette and erase
/// logic see a single representation for "nothing here".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellColor {
    #[default]
    Empty,
    Rgba { r: u8, g: u8, b: u8, a: u8 },
}

impl CellColor {
    pub const BLACK: CellColor = CellColor::Rgba { r: 0, g: 0, b: 0, a: 255 };
    pub const WHITE: CellColor = CellColor::Rgba { r: 255, g: 255, b: 255, a: 255 };

    /// Build a color from byte channels. `a == 0` yields `Empty`.
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        if a == 0 {
            CellColor::Empty
        } else {
            CellColor::Rgba { r, g, b, a }
        }
    }

    pub fn opaque(r: u8, g: u8, b: u8) -> Self {
        CellColor::Rgba { r, g, b, a: 255 }
    }

    /// Build from a 0.0–1.0 alpha fraction (rounded to the nearest byte).
    pub fn with_alpha_fraction(r: u8, g: u8, b: u8, alpha: f32) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::rgba(r, g, b, a)
    }

    pub fn from_pixel(px: Rgba<u8>) -> Self {
        Self::rgba(px[0], px[1], px[2], px[3])
    }

    /// Straight (non-premultiplied) RGBA; `Empty` is transparent black.
    pub fn to_pixel(self) -> Rgba<u8> {
        match self {
            CellColor::Empty => Rgba([0, 0, 0, 0]),
            CellColor::Rgba { r, g, b, a } => Rgba([r, g, b, a]),
        }
    }

    pub fn is_empty(self) -> bool {
        matches!(self, CellColor::Empty)
    }

    pub fn alpha(self) -> u8 {
        match self {
            CellColor::Empty => 0,
            CellColor::Rgba { a, .. } => a,
        }
    }

    pub fn alpha_fraction(self) -> f32 {
        self.alpha() as f32 / 255.0
    }

    /// Canonical text form: `#rrggbb` when opaque, `#rrggbbaa` otherwise,
    /// `transparent` for `Empty`.
    pub fn to_hex(self) -> String {
        match self {
            CellColor::Empty => "transparent".to_string(),
            CellColor::Rgba { r, g, b, a: 255 } => format!("#{:02x}{:02x}{:02x}", r, g, b),
            CellColor::Rgba { r, g, b, a } => format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a),
        }
    }
}

impl fmt::Display for CellColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for CellColor {
    type Err = EditorError;

    /// Accepts `transparent`, `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(r, g, b)`
    /// and `rgba(r, g, b, a)` with `a` as a 0.0–1.0 fraction.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let invalid = || EditorError::InvalidColor(s.to_string());

        if text.eq_ignore_ascii_case("transparent") {
            return Ok(CellColor::Empty);
        }

        if let Some(hex) = text.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = text.to_ascii_lowercase();
        let (body, has_alpha) = if let Some(rest) = lower.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = lower.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();

        match (parts.as_slice(), has_alpha) {
            ([r, g, b], false) => {
                let r = r.parse::<u8>().map_err(|_| invalid())?;
                let g = g.parse::<u8>().map_err(|_| invalid())?;
                let b = b.parse::<u8>().map_err(|_| invalid())?;
                Ok(CellColor::opaque(r, g, b))
            }
            ([r, g, b, a], true) => {
                let r = r.parse::<u8>().map_err(|_| invalid())?;
                let g = g.parse::<u8>().map_err(|_| invalid())?;
                let b = b.parse::<u8>().map_err(|_| invalid())?;
                let a = a.parse::<f32>().map_err(|_| invalid())?;
                if !(0.0..=1.0).contains(&a) {
                    return Err(invalid());
                }
                Ok(CellColor::with_alpha_fraction(r, g, b, a))
            }
            _ => Err(invalid()),
        }
    }
}

fn parse_hex(hex: &str) -> Option<CellColor> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(CellColor::opaque(nibble(0)?, nibble(1)?, nibble(2)?))
        }
        6 => Some(CellColor::opaque(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(CellColor::rgba(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_alpha_is_empty() {
        assert_eq!(CellColor::rgba(10, 20, 30, 0), CellColor::Empty);
        assert_eq!(CellColor::from_pixel(Rgba([255, 0, 0, 0])), CellColor::Empty);
    }

    #[test]
    fn opaque_black_spellings_compare_equal() {
        let forms = ["rgba(0,0,0,1)", "rgb(0, 0, 0)", "#000", "#000000", "#000000FF"];
        for form in forms {
            assert_eq!(form.parse::<CellColor>().unwrap(), CellColor::BLACK, "{}", form);
        }
        assert_eq!(CellColor::BLACK.to_hex(), "#000000");
    }

    #[test]
    fn translucent_hex_keeps_alpha_byte() {
        let c: CellColor = "rgba(255, 0, 0, 0.5)".parse().unwrap();
        assert_eq!(c, CellColor::Rgba { r: 255, g: 0, b: 0, a: 128 });
        assert_eq!(c.to_hex(), "#ff000080");
    }

    #[test]
    fn transparent_parses_to_empty() {
        assert_eq!("transparent".parse::<CellColor>().unwrap(), CellColor::Empty);
        assert_eq!("rgba(1, 2, 3, 0)".parse::<CellColor>().unwrap(), CellColor::Empty);
        assert_eq!(CellColor::Empty.to_hex(), "transparent");
    }

    #[test]
    fn malformed_text_is_rejected() {
        for bad in ["", "#12", "#zzzzzz", "rgb(1,2)", "rgb(300,0,0)", "rgba(0,0,0,2)", "red"] {
            assert!(
                matches!(bad.parse::<CellColor>(), Err(EditorError::InvalidColor(_))),
                "{:?} should fail",
                bad
            );
        }
    }

    #[test]
    fn pixel_roundtrip_for_empty_is_transparent_black() {
        assert_eq!(CellColor::Empty.to_pixel(), Rgba([0, 0, 0, 0]));
        assert_eq!(CellColor::opaque(1, 2, 3).to_pixel(), Rgba([1, 2, 3, 255]));
    }
}
