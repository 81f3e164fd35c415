//! Turns per-case move lists and channel rows into compiled descriptors.

use crate::anim::activity::animate_activities;
use crate::anim::attr::AttributeSchedule;
use crate::compile::descriptor::{
    ActivityDescriptor, AttrTimeline, CompiledAnimation, MotionSegment, TargetAttr,
    TokenDescriptor, Visibility,
};
use crate::foundation::error::ProcanimResult;
use crate::scales::build::{Scale, Scales};
use crate::scales::value::VisualValue;
use crate::scene::graph::GraphGeometry;
use crate::scene::payload::{AnimationDef, ChannelRow, TokenRow};
use std::collections::BTreeMap;

/// Dwell at the final activity before the token comes to rest.
pub const TERMINAL_DWELL_SECS: f64 = 0.5;

/// Nudge past the reveal instant so the token does not flash at its first
/// edge before the travel leg starts.
pub const REVEAL_NUDGE_SECS: f64 = 0.001;

/// Grace period after the last dwell before the token is removed.
pub const HIDE_GRACE_SECS: f64 = 0.5;

/// Compile the payload into renderable descriptors.
///
/// Cases referencing edges the layout does not know are skipped with a
/// warning and listed in [`CompiledAnimation::skipped`]; one bad case never
/// aborts the whole animation.
pub fn compile_animation(
    def: &AnimationDef,
    graph: &GraphGeometry,
    scales: &Scales,
) -> ProcanimResult<CompiledAnimation> {
    let mut moves: BTreeMap<&str, Vec<&TokenRow>> = BTreeMap::new();
    for row in &def.tokens {
        moves.entry(row.case.as_str()).or_default().push(row);
    }

    let mut tokens = Vec::new();
    let mut skipped = Vec::new();

    for (case, mut case_moves) in moves {
        case_moves.sort_by(|a, b| a.token_start.total_cmp(&b.token_start));

        match compile_case(case, &case_moves, def, graph) {
            Some(mut token) => {
                token.attrs = token_attrs(case, def, scales);
                tokens.push(token);
            }
            None => skipped.push(case.to_owned()),
        }
    }

    let activities = animate_activities(def, scales)
        .into_iter()
        .map(|(activity, s)| {
            let mut attrs = Vec::new();
            for (target, schedule) in [
                (TargetAttr::Fill, s.fill),
                (TargetAttr::TextFill, s.text_fill),
                (TargetAttr::Stroke, s.stroke),
                (TargetAttr::FillOpacity, s.opacity),
            ] {
                if !schedule.is_empty() {
                    attrs.push(AttrTimeline { target, schedule });
                }
            }
            ActivityDescriptor { activity, attrs }
        })
        .collect();

    tracing::debug!(
        tokens = tokens.len(),
        skipped = skipped.len(),
        "compiled animation"
    );

    Ok(CompiledAnimation {
        tokens,
        activities,
        duration: def.duration,
        skipped,
    })
}

/// Compile one case's motion and visibility. `None` means the case hit a
/// data-integrity fault and must be skipped.
fn compile_case(
    case: &str,
    case_moves: &[&TokenRow],
    def: &AnimationDef,
    graph: &GraphGeometry,
) -> Option<TokenDescriptor> {
    let first = case_moves.first()?;
    let last = case_moves[case_moves.len() - 1];

    let mut motion = Vec::with_capacity(case_moves.len() * 2);

    for (i, mv) in case_moves.iter().enumerate() {
        let Some(edge) = graph.edge(mv.edge) else {
            tracing::warn!(case, edge = mv.edge.0, "unknown edge, skipping case");
            return None;
        };

        motion.push(MotionSegment::Travel {
            edge: mv.edge,
            begin: mv.token_start,
            duration: mv.token_duration,
        });

        let arrive_begin = mv.token_start + mv.token_duration;
        let is_last = i + 1 == case_moves.len();

        let (to, duration) = if is_last {
            // Come to rest at the end activity when the layout knows it.
            let rest = def
                .end_activity
                .and_then(|id| graph.node_center(id))
                .unwrap_or(edge.end);
            (rest, TERMINAL_DWELL_SECS)
        } else {
            let next = case_moves[i + 1];
            let Some(next_edge) = graph.edge(next.edge) else {
                tracing::warn!(case, edge = next.edge.0, "unknown edge, skipping case");
                return None;
            };
            (next_edge.start, mv.activity_duration)
        };

        motion.push(MotionSegment::Arrive {
            begin: arrive_begin,
            duration,
            from: edge.end,
            to,
        });
    }

    // The schedule runs until the last move's own dwell elapses; only the
    // terminal arrival segment uses the fixed half-second rest.
    let schedule_end = last.token_start + last.token_duration + last.activity_duration;
    let hide = schedule_end + HIDE_GRACE_SECS;

    let reveal = if first.token_start != 0.0 {
        Some(first.token_start + REVEAL_NUDGE_SECS)
    } else {
        None
    };

    Some(TokenDescriptor {
        case: case.to_owned(),
        motion,
        visibility: Visibility { reveal, hide },
        attrs: Vec::new(),
        duration: schedule_end,
    })
}

/// Build the attribute timelines for one case across all token channels.
fn token_attrs(case: &str, def: &AnimationDef, scales: &Scales) -> Vec<AttrTimeline> {
    fn changes(
        rows: &[ChannelRow],
        case: &str,
        scale: &Scale,
    ) -> Vec<(f64, VisualValue)> {
        rows.iter()
            .filter(|r| r.case == case)
            .map(|r| (r.time_secs(), scale.map(&r.value)))
            .collect()
    }

    let mut attrs = Vec::new();

    let fill = AttributeSchedule::build(changes(&def.colors, case, &scales.color), false);
    if !fill.is_empty() {
        attrs.push(AttrTimeline {
            target: TargetAttr::Fill,
            schedule: fill,
        });
    }

    let opacity =
        AttributeSchedule::build(changes(&def.opacities, case, &scales.opacity), false);
    if !opacity.is_empty() {
        attrs.push(AttrTimeline {
            target: TargetAttr::FillOpacity,
            schedule: opacity,
        });
    }

    let size = AttributeSchedule::build(changes(&def.sizes, case, &scales.size), false);
    if !size.is_empty() {
        if def.shape.sized_by_extent() {
            // Extent-shaped markers animate both dimensions in lockstep.
            attrs.push(AttrTimeline {
                target: TargetAttr::Height,
                schedule: size.clone(),
            });
            attrs.push(AttrTimeline {
                target: TargetAttr::Width,
                schedule: size,
            });
        } else {
            attrs.push(AttrTimeline {
                target: TargetAttr::Radius,
                schedule: size,
            });
        }
    }

    // The first image must be present at element creation so the resource
    // starts loading; it always lands in the baseline slot.
    let href = AttributeSchedule::build(changes(&def.images, case, &scales.image), true);
    if !href.is_empty() {
        attrs.push(AttrTimeline {
            target: TargetAttr::Href,
            schedule: href,
        });
    }

    attrs
}

#[cfg(test)]
#[path = "../../tests/unit/compile/compiler.rs"]
mod tests;
