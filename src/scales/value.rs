use crate::foundation::core::Rgba8;
use std::cmp::Ordering;
use std::fmt;

/// A raw value observed in a channel column of the payload.
///
/// Time-typed channels carry epoch milliseconds as numbers; the host
/// marshalling converts dates before the payload crosses the boundary.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum ChannelValue {
    /// Numeric value (sizes, opacities, timestamps).
    Number(f64),
    /// Categorical value (case classes, image urls, color names).
    Text(String),
}

impl ChannelValue {
    /// Numeric view with lossy coercion: text that parses as a number is
    /// accepted, anything else becomes `0.0`.
    pub fn as_f64_lossy(&self) -> f64 {
        match self {
            Self::Number(n) if n.is_finite() => *n,
            Self::Number(_) => 0.0,
            Self::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        }
    }

    /// Total order used for domain inference: numbers first (numerically),
    /// then texts (lexicographically).
    pub fn domain_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
        }
    }
}

impl fmt::Display for ChannelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// The visual output of a scale: what the renderer writes into an attribute.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum VisualValue {
    /// Parsed color; interpolates channel-wise in continuous scales.
    Color(Rgba8),
    /// Numeric attribute value (radius, opacity, pixel size).
    Number(f64),
    /// Opaque string attribute value (image href, raw markup).
    Text(String),
}

impl VisualValue {
    /// Classify a raw range entry: colors are detected eagerly so that
    /// continuous scales can interpolate them.
    pub fn from_channel_value(v: &ChannelValue) -> Self {
        match v {
            ChannelValue::Number(n) => Self::Number(*n),
            ChannelValue::Text(s) => match Rgba8::parse_css(s) {
                Some(c) => Self::Color(c),
                None => Self::Text(s.clone()),
            },
        }
    }

    /// Interpolate between two stops with `t` in `[0, 1]`.
    ///
    /// Mixed or non-interpolatable stop kinds hold the lower stop (step
    /// behavior) rather than fabricating values.
    pub fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        match (a, b) {
            (Self::Number(x), Self::Number(y)) => Self::Number(crate::foundation::math::lerp_f64(*x, *y, t)),
            (Self::Color(x), Self::Color(y)) => Self::Color(Rgba8::lerp(*x, *y, t)),
            _ => a.clone(),
        }
    }

    /// Numeric view, `0.0` for non-numeric stops.
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(n) => *n,
            _ => 0.0,
        }
    }
}

impl fmt::Display for VisualValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Color(c) => write!(f, "{c}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scales/value.rs"]
mod tests;
