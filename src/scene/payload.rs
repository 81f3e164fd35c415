use crate::foundation::core::{ActivityId, EdgeId};
use crate::foundation::error::{ProcanimError, ProcanimResult};
use crate::foundation::math::safe_f64;
use crate::scales::build::ScaleSpec;
use crate::scales::value::ChannelValue;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// One token movement record: a case traversing one edge.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TokenRow {
    /// Case identifier the token belongs to.
    pub case: String,
    /// Edge the token travels along.
    pub edge: EdgeId,
    /// Domain-time start of the traversal, in seconds.
    #[serde(default)]
    pub token_start: f64,
    /// Travel time along the edge, in seconds.
    #[serde(default)]
    pub token_duration: f64,
    /// Dwell time at the edge's target activity, in seconds.
    #[serde(default)]
    pub activity_duration: f64,
}

/// One timed attribute change for a token channel.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ChannelRow {
    /// Case the change applies to.
    pub case: String,
    /// Change time in seconds; absent or unparseable times coerce to `0.0`.
    #[serde(default)]
    pub time: Option<f64>,
    /// Raw channel value, mapped through the channel scale at compile time.
    pub value: ChannelValue,
}

impl ChannelRow {
    /// Change time with the numeric-fault coercion applied.
    pub fn time_secs(&self) -> f64 {
        safe_f64(self.time)
    }
}

/// One timed attribute change for an activity node channel.
///
/// Unlike token rows the value is optional: a null value marks a channel the
/// host populated with placeholder rows only.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ActivityRow {
    /// Activity node the change applies to.
    pub activity: ActivityId,
    /// Change time in seconds.
    #[serde(default)]
    pub time: Option<f64>,
    /// Raw channel value, or null for a placeholder row.
    pub value: Option<ChannelValue>,
}

impl ActivityRow {
    /// Change time with the numeric-fault coercion applied.
    pub fn time_secs(&self) -> f64 {
        safe_f64(self.time)
    }
}

/// How the playback control displays and maps time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimelineMode {
    /// Seconds relative to the timeline start.
    #[default]
    Relative,
    /// Absolute wall-clock time (epoch milliseconds).
    Absolute,
    /// Control renders but live clock updates are disabled.
    Off,
}

/// Whether playback starts running or paused.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InitialState {
    /// Start with the clock running.
    #[default]
    Playing,
    /// Start with the clock paused at `initial_time`.
    Paused,
}

/// Token marker shape; decides which attributes the size channel targets.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TokenShape {
    /// Circle marker; size drives the radius.
    #[default]
    Circle,
    /// Rectangle marker; size drives width and height.
    Rect,
    /// Image marker; size drives width and height.
    Image,
    /// Host-defined marker element name; treated like a rectangle.
    Custom(String),
}

impl From<String> for TokenShape {
    fn from(s: String) -> Self {
        match s.as_str() {
            "circle" => Self::Circle,
            "rect" => Self::Rect,
            "image" => Self::Image,
            _ => Self::Custom(s),
        }
    }
}

impl From<TokenShape> for String {
    fn from(shape: TokenShape) -> Self {
        match shape {
            TokenShape::Circle => "circle".to_owned(),
            TokenShape::Rect => "rect".to_owned(),
            TokenShape::Image => "image".to_owned(),
            TokenShape::Custom(s) => s,
        }
    }
}

impl TokenShape {
    /// Whether the size channel targets width/height instead of a radius.
    pub fn sized_by_extent(&self) -> bool {
        !matches!(self, Self::Circle)
    }
}

/// The full animation payload as the host serializes it.
///
/// Every channel and setting carries a serde default so hosts only send
/// what they use; [`AnimationDef::validate`] then checks cross-field
/// invariants once, before anything downstream consumes the payload.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AnimationDef {
    /// Token movement records, in any order.
    #[serde(default)]
    pub tokens: Vec<TokenRow>,

    /// Token fill color changes.
    #[serde(default)]
    pub colors: Vec<ChannelRow>,
    /// Scale spec for the color channel.
    #[serde(default = "ScaleSpec::identity")]
    pub colors_scale: ScaleSpec,
    /// Token size changes.
    #[serde(default)]
    pub sizes: Vec<ChannelRow>,
    /// Scale spec for the size channel.
    #[serde(default = "ScaleSpec::identity")]
    pub sizes_scale: ScaleSpec,
    /// Token fill opacity changes.
    #[serde(default)]
    pub opacities: Vec<ChannelRow>,
    /// Scale spec for the opacity channel.
    #[serde(default = "ScaleSpec::identity")]
    pub opacities_scale: ScaleSpec,
    /// Token image href changes.
    #[serde(default)]
    pub images: Vec<ChannelRow>,
    /// Scale spec for the image channel.
    #[serde(default = "ScaleSpec::identity")]
    pub images_scale: ScaleSpec,

    /// Activity fill color changes.
    #[serde(default)]
    pub act_colors: Vec<ActivityRow>,
    /// Scale spec for the activity fill channel.
    #[serde(default = "ScaleSpec::identity")]
    pub act_colors_scale: ScaleSpec,
    /// Activity stroke color changes.
    #[serde(default)]
    pub act_linecolors: Vec<ActivityRow>,
    /// Scale spec for the activity stroke channel.
    #[serde(default = "ScaleSpec::identity")]
    pub act_linecolors_scale: ScaleSpec,
    /// Activity fill opacity changes.
    #[serde(default)]
    pub act_opacities: Vec<ActivityRow>,
    /// Scale spec for the activity opacity channel.
    #[serde(default = "ScaleSpec::identity")]
    pub act_opacities_scale: ScaleSpec,

    /// Artificial start node id; excluded from activity animation.
    #[serde(default)]
    pub start_activity: Option<ActivityId>,
    /// Artificial end node id; excluded from activity animation and used as
    /// the final arrival target.
    #[serde(default)]
    pub end_activity: Option<ActivityId>,

    /// Total animation duration in seconds. Must be positive.
    pub duration: f64,

    /// Whether the playback control is shown at all.
    #[serde(default)]
    pub timeline: bool,
    /// Domain time mapped to animation time zero.
    #[serde(default)]
    pub timeline_start: f64,
    /// Domain time mapped to the end of the animation.
    #[serde(default)]
    pub timeline_end: f64,
    /// Display/update mode of the control.
    #[serde(default)]
    pub mode: TimelineMode,
    /// Domain seconds per animation second. Must be positive.
    #[serde(default = "default_factor")]
    pub factor: f64,
    /// Number of play-throughs, or `None` for unbounded looping.
    #[serde(default)]
    pub repeat_count: Option<u32>,
    /// Extra seconds past the end before a loop restarts.
    #[serde(default)]
    pub repeat_delay: f64,
    /// Whether playback starts running or paused.
    #[serde(default)]
    pub initial_state: InitialState,
    /// Animation time to seek to on start, clamped to `[0, duration]`.
    #[serde(default)]
    pub initial_time: f64,

    /// Token marker shape.
    #[serde(default)]
    pub shape: TokenShape,
    /// Positional jitter amplitude; passed through to the renderer.
    #[serde(default)]
    pub jitter: f64,
}

fn default_factor() -> f64 {
    1.0
}

impl AnimationDef {
    /// Parse an animation payload from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ProcanimResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ProcanimError::validation(format!("parse animation JSON: {e}")))
    }

    /// Parse an animation payload from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ProcanimResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ProcanimError::validation(format!("open animation JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> ProcanimResult<()> {
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(ProcanimError::validation(format!(
                "duration must be a positive number, got {}",
                self.duration
            )));
        }
        if !(self.factor.is_finite() && self.factor > 0.0) {
            return Err(ProcanimError::validation(format!(
                "factor must be a positive number, got {}",
                self.factor
            )));
        }
        if self.timeline && self.timeline_end < self.timeline_start {
            return Err(ProcanimError::validation(format!(
                "timeline_end ({}) precedes timeline_start ({})",
                self.timeline_end, self.timeline_start
            )));
        }
        for row in &self.tokens {
            if row.token_duration < 0.0 || row.activity_duration < 0.0 {
                return Err(ProcanimError::validation(format!(
                    "case '{}': negative duration on edge {}",
                    row.case, row.edge.0
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/payload.rs"]
mod tests;
