use crate::anim::attr::AttributeSchedule;
use crate::foundation::core::{ActivityId, EdgeId, Point};
use crate::foundation::error::{ProcanimError, ProcanimResult};
use std::fmt::Write as _;

/// Renderer attribute a compiled schedule targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetAttr {
    /// Circle radius (`r`).
    Radius,
    /// Rect/image width.
    Width,
    /// Rect/image height.
    Height,
    /// Fill color.
    Fill,
    /// Fill opacity.
    FillOpacity,
    /// Image resource reference (`href`).
    Href,
    /// Stroke color.
    Stroke,
    /// Label color paired with the fill for contrast.
    TextFill,
}

/// One attribute schedule bound to its target.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AttrTimeline {
    /// Attribute the schedule writes.
    pub target: TargetAttr,
    /// The schedule itself.
    pub schedule: AttributeSchedule,
}

/// One leg of a token's motion.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MotionSegment {
    /// Follow an edge path for its travel time.
    Travel {
        /// Edge whose path the token follows.
        edge: EdgeId,
        /// Animation time the leg begins, in seconds.
        begin: f64,
        /// Leg duration in seconds.
        duration: f64,
    },
    /// Move in a straight line between two points (dwell repositioning).
    Arrive {
        /// Animation time the leg begins, in seconds.
        begin: f64,
        /// Leg duration in seconds.
        duration: f64,
        /// Starting point (previous edge's exit).
        from: Point,
        /// Target point (next edge's entry, or the final resting point).
        to: Point,
    },
}

impl MotionSegment {
    /// Animation time the leg begins.
    pub fn begin(&self) -> f64 {
        match self {
            Self::Travel { begin, .. } | Self::Arrive { begin, .. } => *begin,
        }
    }

    /// Animation time the leg completes.
    pub fn end(&self) -> f64 {
        match self {
            Self::Travel {
                begin, duration, ..
            }
            | Self::Arrive {
                begin, duration, ..
            } => begin + duration,
        }
    }
}

/// When a token exists on screen.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Visibility {
    /// Reveal time, or `None` when the token is visible from time zero.
    pub reveal: Option<f64>,
    /// Time after which the token is removed.
    pub hide: f64,
}

/// Complete compiled schedule for one case's token.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TokenDescriptor {
    /// Case identifier.
    pub case: String,
    /// Motion legs, ascending by begin time.
    pub motion: Vec<MotionSegment>,
    /// On-screen window.
    pub visibility: Visibility,
    /// Attribute schedules, in a deterministic target order.
    pub attrs: Vec<AttrTimeline>,
    /// Time the token's schedule completes: the last travel plus that
    /// move's own dwell.
    pub duration: f64,
}

/// Compiled attribute schedules for one activity node.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ActivityDescriptor {
    /// The node the schedules apply to.
    pub activity: ActivityId,
    /// Attribute schedules, in a deterministic target order.
    pub attrs: Vec<AttrTimeline>,
}

/// Output of the timeline compiler: everything a renderer needs to run the
/// animation, with no residual dependence on the input row order.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct CompiledAnimation {
    /// One descriptor per successfully compiled case, ordered by case id.
    pub tokens: Vec<TokenDescriptor>,
    /// One descriptor per animated activity node, ordered by id.
    pub activities: Vec<ActivityDescriptor>,
    /// Host-declared animation duration in seconds.
    pub duration: f64,
    /// Cases dropped over data-integrity faults, ordered by case id.
    pub skipped: Vec<String>,
}

impl CompiledAnimation {
    /// Error if any case was dropped during compilation.
    ///
    /// Compilation itself is lenient (bad cases are skipped and listed);
    /// hosts that want an all-or-nothing animation check here.
    pub fn require_complete(&self) -> ProcanimResult<()> {
        match self.skipped.first() {
            None => Ok(()),
            Some(case) => Err(ProcanimError::data(format!(
                "case '{case}' was skipped during compilation"
            ))),
        }
    }

    /// Human-readable dump of the compiled schedule, for debugging and for
    /// golden assertions in tests.
    pub fn dump(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "animation duration={:.6}", self.duration);
        for t in &self.tokens {
            let _ = writeln!(s, "token case={} duration={:.6}", t.case, t.duration);
            let _ = writeln!(
                s,
                "  visible reveal={} hide={:.6}",
                match t.visibility.reveal {
                    Some(r) => format!("{r:.6}"),
                    None => "start".to_owned(),
                },
                t.visibility.hide
            );
            for m in &t.motion {
                match m {
                    MotionSegment::Travel {
                        edge,
                        begin,
                        duration,
                    } => {
                        let _ = writeln!(
                            s,
                            "  travel edge={} begin={begin:.6} dur={duration:.6}",
                            edge.0
                        );
                    }
                    MotionSegment::Arrive {
                        begin,
                        duration,
                        from,
                        to,
                    } => {
                        let _ = writeln!(
                            s,
                            "  arrive begin={begin:.6} dur={duration:.6} \
                             from=({:.2},{:.2}) to=({:.2},{:.2})",
                            from.x, from.y, to.x, to.y
                        );
                    }
                }
            }
            for a in &t.attrs {
                let _ = writeln!(
                    s,
                    "  attr {:?} baseline={:?} events={}",
                    a.target,
                    a.schedule.baseline,
                    a.schedule.events.len()
                );
            }
        }
        for a in &self.activities {
            let _ = writeln!(s, "activity id={} attrs={}", a.activity.0, a.attrs.len());
        }
        for c in &self.skipped {
            let _ = writeln!(s, "skipped case={c}");
        }
        s
    }
}
