//! CSS colour parsing and the lightness floor applied to the scene tint.

use crate::constants::{FALLBACK_PRIMARY, MIN_SCENE_LIGHTNESS};

/// Gamma-encoded sRGB triple in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()/rgba()` or a handful of
    /// named colours. Alpha is dropped.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(body) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let mut parts = body.split(',').map(|p| p.trim());
            let r = parse_channel(parts.next()?)?;
            let g = parse_channel(parts.next()?)?;
            let b = parse_channel(parts.next()?)?;
            return Some(Self::new(r, g, b));
        }
        named(&s)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_hex(self) -> String {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", q(self.r), q(self.g), q(self.b))
    }

    pub fn to_hsl(self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) * 0.5;
        if (max - min).abs() < f32::EPSILON {
            return Hsl { h: 0.0, s: 0.0, l };
        }
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };
        Hsl { h: h / 6.0, s, l }
    }

    pub fn from_hsl(hsl: Hsl) -> Self {
        let Hsl { h, s, l } = hsl;
        if s <= 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self::new(
            hue_to_rgb(p, q, h + 1.0 / 3.0),
            hue_to_rgb(p, q, h),
            hue_to_rgb(p, q, h - 1.0 / 3.0),
        )
    }
}

/// Resolve the palette primary into the tint the scene draws with.
///
/// Unparseable input falls back to [`FALLBACK_PRIMARY`]; lightness is raised to
/// [`MIN_SCENE_LIGHTNESS`] so the tint stays visible on black.
pub fn scene_tint(primary: &str) -> Rgb {
    let base = Rgb::parse(primary)
        .or_else(|| Rgb::parse(FALLBACK_PRIMARY))
        .unwrap_or(Rgb::new(0.545, 0.361, 0.965));
    let mut hsl = base.to_hsl();
    hsl.l = hsl.l.max(MIN_SCENE_LIGHTNESS);
    Rgb::from_hsl(hsl)
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    let nibble = |c: u8| (c as char).to_digit(16).map(|v| v as f32);
    let bytes = hex.as_bytes();
    match bytes.len() {
        3 | 4 => Some(Rgb::new(
            nibble(bytes[0])? * 17.0 / 255.0,
            nibble(bytes[1])? * 17.0 / 255.0,
            nibble(bytes[2])? * 17.0 / 255.0,
        )),
        6 | 8 => {
            let byte = |i: usize| Some((nibble(bytes[i])? * 16.0 + nibble(bytes[i + 1])?) / 255.0);
            Some(Rgb::new(byte(0)?, byte(2)?, byte(4)?))
        }
        _ => None,
    }
}

fn parse_channel(part: &str) -> Option<f32> {
    if let Some(pct) = part.strip_suffix('%') {
        return pct.trim().parse::<f32>().ok().map(|v| (v / 100.0).clamp(0.0, 1.0));
    }
    part.parse::<f32>().ok().map(|v| (v / 255.0).clamp(0.0, 1.0))
}

fn named(name: &str) -> Option<Rgb> {
    let hex = match name {
        "black" => "000000",
        "white" => "ffffff",
        "red" => "ff0000",
        "green" => "008000",
        "blue" => "0000ff",
        "yellow" => "ffff00",
        "orange" => "ffa500",
        "purple" => "800080",
        "pink" => "ffc0cb",
        "teal" => "008080",
        "navy" => "000080",
        "gray" | "grey" => "808080",
        "gold" => "ffd700",
        "cyan" => "00ffff",
        "magenta" => "ff00ff",
        _ => return None,
    };
    parse_hex(hex)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-3 && (a.g - b.g).abs() < 1e-3 && (a.b - b.b).abs() < 1e-3
    }

    #[test]
    fn parses_common_css_forms() {
        assert_eq!(Rgb::parse("#fff"), Some(Rgb::new(1.0, 1.0, 1.0)));
        assert!(close(Rgb::parse("#8B5CF6").unwrap(), Rgb::new(0.545, 0.361, 0.965)));
        assert!(close(Rgb::parse("rgb(255, 0, 0)").unwrap(), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(Rgb::parse("rgba(0,0,255,0.5)").unwrap(), Rgb::new(0.0, 0.0, 1.0)));
        assert_eq!(Rgb::parse(" Navy ").map(|c| c.to_hex()), Some("#000080".into()));
        assert_eq!(Rgb::parse("#12"), None);
        assert_eq!(Rgb::parse("tomato-ish"), None);
    }

    #[test]
    fn hsl_round_trip_is_stable() {
        for hex in ["#8b5cf6", "#0ea5e9", "#22c55e", "#111111", "#ff8800"] {
            let c = Rgb::parse(hex).unwrap();
            assert!(close(Rgb::from_hsl(c.to_hsl()), c), "{hex}");
        }
    }

    #[test]
    fn dark_primary_is_lifted_to_the_floor() {
        let tint = scene_tint("#0a0a2a");
        assert!((tint.to_hsl().l - MIN_SCENE_LIGHTNESS).abs() < 1e-3);
        // hue is preserved
        let src = Rgb::parse("#0a0a2a").unwrap().to_hsl();
        assert!((tint.to_hsl().h - src.h).abs() < 1e-3);
    }

    #[test]
    fn bright_primary_is_untouched() {
        let c = Rgb::parse("#f0abfc").unwrap();
        assert!(close(scene_tint("#f0abfc"), c));
    }

    #[test]
    fn garbage_falls_back_to_default_primary() {
        let fallback = scene_tint(FALLBACK_PRIMARY);
        assert!(close(scene_tint(""), fallback));
        assert!(close(scene_tint("not a colour"), fallback));
    }
}
