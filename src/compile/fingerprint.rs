//! Stable fingerprint over compiled animations.
//!
//! Hosts re-send the full payload on every widget update; hashing the
//! compiled output lets them skip tearing down and re-inserting an
//! animation that did not actually change.

use crate::anim::attr::AttributeSchedule;
use crate::compile::descriptor::{
    ActivityDescriptor, AttrTimeline, CompiledAnimation, MotionSegment, TargetAttr,
    TokenDescriptor,
};
use crate::scales::value::VisualValue;
use xxhash_rust::xxh3::Xxh3;

const XXH3_SEED: u64 = 0x3d21_a9f0_5c64_b817;

/// 128-bit stable fingerprint of a compiled animation.
///
/// Stable across runs and platforms; two animations with equal fingerprints
/// render identically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AnimationFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

impl std::fmt::Display for AnimationFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}{:016x}", self.hi, self.lo)
    }
}

/// Fingerprint a compiled animation.
pub fn fingerprint_animation(anim: &CompiledAnimation) -> AnimationFingerprint {
    let mut h = StableHasher::new();
    h.write_f64(anim.duration);

    h.write_u32(anim.tokens.len() as u32);
    for t in &anim.tokens {
        write_token(&mut h, t);
    }

    h.write_u32(anim.activities.len() as u32);
    for a in &anim.activities {
        write_activity(&mut h, a);
    }

    h.write_u32(anim.skipped.len() as u32);
    for c in &anim.skipped {
        h.write_str(c);
    }

    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u32(s.len() as u32);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> AnimationFingerprint {
        let v = self.inner.digest128();
        AnimationFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_token(h: &mut StableHasher, t: &TokenDescriptor) {
    h.write_str(&t.case);
    h.write_f64(t.duration);

    match t.visibility.reveal {
        None => h.write_u8(0),
        Some(r) => {
            h.write_u8(1);
            h.write_f64(r);
        }
    }
    h.write_f64(t.visibility.hide);

    h.write_u32(t.motion.len() as u32);
    for m in &t.motion {
        match m {
            MotionSegment::Travel {
                edge,
                begin,
                duration,
            } => {
                h.write_u8(0);
                h.write_u32(edge.0);
                h.write_f64(*begin);
                h.write_f64(*duration);
            }
            MotionSegment::Arrive {
                begin,
                duration,
                from,
                to,
            } => {
                h.write_u8(1);
                h.write_f64(*begin);
                h.write_f64(*duration);
                h.write_f64(from.x);
                h.write_f64(from.y);
                h.write_f64(to.x);
                h.write_f64(to.y);
            }
        }
    }

    h.write_u32(t.attrs.len() as u32);
    for a in &t.attrs {
        write_attr(h, a);
    }
}

fn write_activity(h: &mut StableHasher, a: &ActivityDescriptor) {
    h.write_u32(a.activity.0);
    h.write_u32(a.attrs.len() as u32);
    for attr in &a.attrs {
        write_attr(h, attr);
    }
}

fn write_attr(h: &mut StableHasher, a: &AttrTimeline) {
    h.write_u8(match a.target {
        TargetAttr::Radius => 0,
        TargetAttr::Width => 1,
        TargetAttr::Height => 2,
        TargetAttr::Fill => 3,
        TargetAttr::FillOpacity => 4,
        TargetAttr::Href => 5,
        TargetAttr::Stroke => 6,
        TargetAttr::TextFill => 7,
    });
    write_schedule(h, &a.schedule);
}

fn write_schedule(h: &mut StableHasher, s: &AttributeSchedule) {
    match &s.baseline {
        None => h.write_u8(0),
        Some(v) => {
            h.write_u8(1);
            write_value(h, v);
        }
    }
    h.write_u32(s.events.len() as u32);
    for e in &s.events {
        h.write_f64(e.time);
        write_value(h, &e.value);
    }
}

fn write_value(h: &mut StableHasher, v: &VisualValue) {
    match v {
        VisualValue::Color(c) => {
            h.write_u8(0);
            h.write_bytes(&[c.r, c.g, c.b, c.a]);
        }
        VisualValue::Number(n) => {
            h.write_u8(1);
            h.write_f64(*n);
        }
        VisualValue::Text(s) => {
            h.write_u8(2);
            h.write_str(s);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compile/fingerprint.rs"]
mod tests;
