use crate::foundation::error::{ProcanimError, ProcanimResult};
use crate::foundation::math::unlerp_clamped;
use crate::scales::value::{ChannelValue, VisualValue};
use crate::scene::payload::AnimationDef;

/// Scale family, resolved at payload deserialization time.
///
/// Unrecognized payload strings collapse to `Identity` (pass-through), so
/// dispatch below is an exhaustive match with no string fallthrough.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    /// Linear interpolation over a numeric domain.
    Linear,
    /// Square-root-transformed numeric domain.
    Sqrt,
    /// Log-transformed numeric domain.
    Log,
    /// Discrete buckets over a numeric domain.
    Quantize,
    /// Discrete lookup over categorical values.
    Ordinal,
    /// Linear over epoch-millisecond timestamps.
    Time,
    /// Pass-through: range equals domain.
    Identity,
}

impl<'de> serde::Deserialize<'de> for ScaleKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(match s.as_str() {
            "linear" => Self::Linear,
            "sqrt" => Self::Sqrt,
            "log" => Self::Log,
            "quantize" => Self::Quantize,
            "ordinal" => Self::Ordinal,
            "time" => Self::Time,
            _ => Self::Identity,
        })
    }
}

/// Declarative scale description as it arrives in the payload.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ScaleSpec {
    /// Scale family.
    #[serde(rename = "scale")]
    pub kind: ScaleKind,
    /// Explicit domain, or `None` to infer from observed values.
    #[serde(default)]
    pub domain: Option<Vec<ChannelValue>>,
    /// Explicit range, or `None` for a constant default range.
    #[serde(default)]
    pub range: Option<Vec<ChannelValue>>,
}

impl ScaleSpec {
    /// Spec for a pass-through scale; the usual payload default.
    pub fn identity() -> Self {
        Self {
            kind: ScaleKind::Identity,
            domain: None,
            range: None,
        }
    }
}

/// Domain-axis transform applied before interpolation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Curve {
    /// No transform.
    Linear,
    /// Square root; negative inputs clamp to zero.
    Sqrt,
    /// Natural log; non-positive inputs clamp to the smallest positive value.
    Log,
}

impl Curve {
    /// Non-positive log inputs clamp to the smallest positive value instead
    /// of producing NaN; lossy-coercion policy for numeric faults.
    fn forward(self, x: f64) -> f64 {
        match self {
            Self::Linear => x,
            Self::Sqrt => x.max(0.0).sqrt(),
            Self::Log => x.max(f64::MIN_POSITIVE).ln(),
        }
    }
}

/// A constructed value-to-visual mapping.
///
/// Scales are immutable after construction and safe to share across render
/// passes: [`Scale::map`] takes `&self` and has no side effects.
#[derive(Clone, Debug)]
pub enum Scale {
    /// Piecewise interpolation between paired domain/range stops.
    Continuous {
        /// Domain-axis transform.
        curve: Curve,
        /// Ascending numeric domain stops.
        domain: Vec<f64>,
        /// Range stops paired with the domain by index.
        range: Vec<VisualValue>,
    },
    /// Uniform buckets over `[lo, hi]`, one per range entry.
    Quantize {
        /// Lower domain bound.
        lo: f64,
        /// Upper domain bound.
        hi: f64,
        /// Bucket outputs.
        range: Vec<VisualValue>,
    },
    /// Discrete lookup by position in the domain.
    Ordinal {
        /// Known domain values in order.
        domain: Vec<ChannelValue>,
        /// Range values, cycled when shorter than the domain.
        range: Vec<VisualValue>,
        /// Echo unknown inputs instead of falling back to `range[0]`.
        passthrough: bool,
    },
}

/// Sort and dedup adjacent equal values; the inferred-domain candidates.
fn compute_domain(values: &[ChannelValue]) -> Vec<ChannelValue> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.domain_cmp(b));
    sorted.dedup();
    sorted
}

impl Scale {
    /// A scale that maps every input to `default`.
    ///
    /// Used for channels that carry no observations at all; there is nothing
    /// to look up, so every query yields the channel default.
    pub fn constant(default: VisualValue) -> Self {
        Self::Ordinal {
            domain: Vec::new(),
            range: vec![default],
            passthrough: false,
        }
    }

    /// Construct a scale from its spec and the observed channel values.
    ///
    /// With both an explicit domain and range this never fails. With neither
    /// an explicit domain nor any observed values there are no bounds to
    /// infer, and construction reports a scale error instead of silently
    /// producing NaN bounds.
    pub fn build(
        spec: &ScaleSpec,
        observed: &[ChannelValue],
        default: VisualValue,
    ) -> ProcanimResult<Self> {
        let candidates = compute_domain(observed);

        let domain: Vec<ChannelValue> = match &spec.domain {
            Some(d) => d.clone(),
            None => {
                if candidates.is_empty() {
                    return Err(ProcanimError::scale(
                        "cannot infer a domain: no explicit domain and no observed values",
                    ));
                }
                match spec.kind {
                    ScaleKind::Ordinal | ScaleKind::Identity => candidates.clone(),
                    _ => {
                        // Numeric families (time included) infer [min, max].
                        let lo = candidates
                            .iter()
                            .map(ChannelValue::as_f64_lossy)
                            .fold(f64::INFINITY, f64::min);
                        let hi = candidates
                            .iter()
                            .map(ChannelValue::as_f64_lossy)
                            .fold(f64::NEG_INFINITY, f64::max);
                        vec![ChannelValue::Number(lo), ChannelValue::Number(hi)]
                    }
                }
            }
        };

        let range: Vec<VisualValue> = match &spec.range {
            Some(r) => r.iter().map(VisualValue::from_channel_value).collect(),
            None => vec![default],
        };

        fn numeric(domain: &[ChannelValue]) -> Vec<f64> {
            domain.iter().map(ChannelValue::as_f64_lossy).collect()
        }

        let scale = match spec.kind {
            ScaleKind::Linear | ScaleKind::Time => Self::Continuous {
                curve: Curve::Linear,
                domain: numeric(&domain),
                range,
            },
            ScaleKind::Sqrt => Self::Continuous {
                curve: Curve::Sqrt,
                domain: numeric(&domain),
                range,
            },
            ScaleKind::Log => Self::Continuous {
                curve: Curve::Log,
                domain: numeric(&domain),
                range,
            },
            ScaleKind::Quantize => {
                let nd = numeric(&domain);
                let lo = nd.first().copied().unwrap_or(0.0);
                let hi = nd.last().copied().unwrap_or(lo);
                Self::Quantize { lo, hi, range }
            }
            ScaleKind::Ordinal => Self::Ordinal {
                domain,
                range,
                passthrough: false,
            },
            ScaleKind::Identity => {
                // Pass-through: range is forced to equal the domain.
                let range = domain.iter().map(VisualValue::from_channel_value).collect();
                Self::Ordinal {
                    domain,
                    range,
                    passthrough: true,
                }
            }
        };

        Ok(scale)
    }

    /// Map a value to its visual output.
    pub fn map(&self, v: &ChannelValue) -> VisualValue {
        match self {
            Self::Continuous {
                curve,
                domain,
                range,
            } => {
                let n = domain.len().min(range.len());
                if n == 0 {
                    return VisualValue::Number(0.0);
                }
                if n == 1 {
                    return range[0].clone();
                }
                let x = curve.forward(v.as_f64_lossy());
                // Clamp into the outermost segment rather than extrapolating.
                let mut i = n - 2;
                for seg in 0..n - 1 {
                    if x <= curve.forward(domain[seg + 1]) {
                        i = seg;
                        break;
                    }
                }
                let a = curve.forward(domain[i]);
                let b = curve.forward(domain[i + 1]);
                let t = unlerp_clamped(a, b, x);
                VisualValue::lerp(&range[i], &range[i + 1], t)
            }
            Self::Quantize { lo, hi, range } => {
                if range.is_empty() {
                    return VisualValue::Number(0.0);
                }
                let t = unlerp_clamped(*lo, *hi, v.as_f64_lossy());
                let idx = ((t * range.len() as f64) as usize).min(range.len() - 1);
                range[idx].clone()
            }
            Self::Ordinal {
                domain,
                range,
                passthrough,
            } => match domain.iter().position(|d| d == v) {
                Some(i) if !range.is_empty() => range[i % range.len()].clone(),
                Some(_) => VisualValue::from_channel_value(v),
                None if *passthrough => VisualValue::from_channel_value(v),
                None => range
                    .first()
                    .cloned()
                    .unwrap_or_else(|| VisualValue::from_channel_value(v)),
            },
        }
    }
}

/// The full set of channel scales built from one payload.
#[derive(Clone, Debug)]
pub struct Scales {
    /// Token fill color.
    pub color: Scale,
    /// Token size (radius or width/height).
    pub size: Scale,
    /// Token fill opacity.
    pub opacity: Scale,
    /// Token image href.
    pub image: Scale,
    /// Activity node fill color.
    pub act_color: Scale,
    /// Activity node stroke color.
    pub act_linecolor: Scale,
    /// Activity node fill opacity.
    pub act_opacity: Scale,
}

impl Scales {
    /// Default token fill color.
    pub const DEFAULT_COLOR: crate::foundation::core::Rgba8 =
        crate::foundation::core::Rgba8::rgb(255, 255, 255);
    /// Default token size in pixels.
    pub const DEFAULT_SIZE: f64 = 6.0;
    /// Default token fill opacity.
    pub const DEFAULT_OPACITY: f64 = 0.9;

    /// Build every channel scale from the payload.
    ///
    /// A channel with no rows at all gets a constant default scale; a
    /// channel with rows but an unresolvable spec is an error.
    pub fn build(def: &AnimationDef) -> ProcanimResult<Self> {
        fn channel(
            spec: &ScaleSpec,
            observed: Vec<ChannelValue>,
            default: VisualValue,
        ) -> ProcanimResult<Scale> {
            if observed.is_empty() && spec.domain.is_none() && spec.range.is_none() {
                return Ok(Scale::constant(default));
            }
            Scale::build(spec, &observed, default)
        }

        let white = VisualValue::Color(Self::DEFAULT_COLOR);

        Ok(Self {
            color: channel(
                &def.colors_scale,
                def.colors.iter().map(|r| r.value.clone()).collect(),
                white.clone(),
            )?,
            size: channel(
                &def.sizes_scale,
                def.sizes.iter().map(|r| r.value.clone()).collect(),
                VisualValue::Number(Self::DEFAULT_SIZE),
            )?,
            opacity: channel(
                &def.opacities_scale,
                def.opacities.iter().map(|r| r.value.clone()).collect(),
                VisualValue::Number(Self::DEFAULT_OPACITY),
            )?,
            image: channel(
                &def.images_scale,
                def.images.iter().map(|r| r.value.clone()).collect(),
                VisualValue::Text(String::new()),
            )?,
            act_color: channel(
                &def.act_colors_scale,
                def.act_colors
                    .iter()
                    .filter_map(|r| r.value.clone())
                    .collect(),
                white.clone(),
            )?,
            act_linecolor: channel(
                &def.act_linecolors_scale,
                def.act_linecolors
                    .iter()
                    .filter_map(|r| r.value.clone())
                    .collect(),
                white,
            )?,
            act_opacity: channel(
                &def.act_opacities_scale,
                def.act_opacities
                    .iter()
                    .filter_map(|r| r.value.clone())
                    .collect(),
                VisualValue::Number(Self::DEFAULT_OPACITY),
            )?,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scales/build.rs"]
mod tests;
