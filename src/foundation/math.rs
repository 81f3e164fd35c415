/// Coerce a possibly missing or non-finite number to a safe value.
///
/// Mirrors the lossy numeric-fault policy at the payload boundary: absent,
/// NaN, and infinite inputs all become `0.0` instead of propagating.
pub(crate) fn safe_f64(v: Option<f64>) -> f64 {
    match v {
        Some(x) if x.is_finite() => x,
        _ => 0.0,
    }
}

pub(crate) fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Normalized position of `x` between `a` and `b`, clamped to `[0, 1]`.
///
/// A degenerate span (`a == b`, or NaN anywhere) maps to `0.0`.
pub(crate) fn unlerp_clamped(a: f64, b: f64, x: f64) -> f64 {
    let span = b - a;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    let t = (x - a) / span;
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
