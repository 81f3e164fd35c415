pub use kurbo::Point;

use std::fmt;

/// Identifier of one directed edge in the process graph.
///
/// Matches the numeric edge ids the host's layout engine assigns; the
/// compiled travel segments reference edges by this id and the renderer
/// resolves them to concrete path geometry.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

/// Identifier of one activity node in the process graph.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ActivityId(pub u32);

/// Straight-alpha RGBA8 color.
///
/// Serialized as a CSS hex string (`#rrggbb`, or `#rrggbbaa` when the alpha
/// channel is not opaque) so compiled descriptors stay directly consumable
/// by an SVG/DOM renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a CSS hex color: `#rgb`, `#rrggbb`, or `#rrggbbaa`.
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#')?;
        fn nib(b: u8) -> Option<u8> {
            (b as char).to_digit(16).map(|d| d as u8)
        }
        fn byte(hi: u8, lo: u8) -> Option<u8> {
            Some(nib(hi)? << 4 | nib(lo)?)
        }
        let b = hex.as_bytes();
        match b.len() {
            3 => Some(Self::rgb(
                byte(b[0], b[0])?,
                byte(b[1], b[1])?,
                byte(b[2], b[2])?,
            )),
            6 => Some(Self::rgb(
                byte(b[0], b[1])?,
                byte(b[2], b[3])?,
                byte(b[4], b[5])?,
            )),
            8 => Some(Self {
                r: byte(b[0], b[1])?,
                g: byte(b[2], b[3])?,
                b: byte(b[4], b[5])?,
                a: byte(b[6], b[7])?,
            }),
            _ => None,
        }
    }

    /// Resolve a CSS color string: hex forms plus the named colors the host
    /// payloads commonly carry.
    pub fn parse_css(s: &str) -> Option<Self> {
        if s.starts_with('#') {
            return Self::from_hex(s);
        }
        let named = match s.to_ascii_lowercase().as_str() {
            "white" => Self::rgb(255, 255, 255),
            "black" => Self::rgb(0, 0, 0),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "yellow" => Self::rgb(255, 255, 0),
            "orange" => Self::rgb(255, 165, 0),
            "purple" => Self::rgb(128, 0, 128),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            _ => return None,
        };
        Some(named)
    }

    /// Channel-wise linear interpolation with `t` in `[0, 1]`.
    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }
        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }

    /// Relative luminance per WCAG, in `[0, 1]`.
    pub fn relative_luminance(self) -> f64 {
        fn lin(c: u8) -> f64 {
            let c = f64::from(c) / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * lin(self.r) + 0.7152 * lin(self.g) + 0.0722 * lin(self.b)
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

impl serde::Serialize for Rgba8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Rgba8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse_css(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
