use crate::anim::attr::AttributeSchedule;
use crate::foundation::core::{ActivityId, Rgba8};
use crate::scales::build::{Scale, Scales};
use crate::scales::value::VisualValue;
use crate::scene::payload::{ActivityRow, AnimationDef};
use std::collections::BTreeMap;

/// Luminance threshold separating dark text from light text on a fill.
///
/// Solid midpoint of the WCAG contrast-ratio equation: fills brighter than
/// this contrast better against black, darker ones against white.
const TEXT_CONTRAST_LUMINANCE: f64 = 0.179;

/// Label color with the best contrast against `fill`.
pub fn contrast_text_fill(fill: Rgba8) -> Rgba8 {
    if fill.relative_luminance() > TEXT_CONTRAST_LUMINANCE {
        Rgba8::rgb(0, 0, 0)
    } else {
        Rgba8::rgb(255, 255, 255)
    }
}

/// Compiled attribute schedules for one activity node.
#[derive(Clone, Debug, Default)]
pub struct ActivitySchedules {
    /// Node fill color.
    pub fill: AttributeSchedule,
    /// Label color paired with each fill change for contrast.
    pub text_fill: AttributeSchedule,
    /// Node stroke color.
    pub stroke: AttributeSchedule,
    /// Node fill opacity.
    pub opacity: AttributeSchedule,
}

impl ActivitySchedules {
    /// Whether any channel writes anything.
    pub fn is_empty(&self) -> bool {
        self.fill.is_empty()
            && self.text_fill.is_empty()
            && self.stroke.is_empty()
            && self.opacity.is_empty()
    }
}

/// Group channel rows by activity, dropping placeholder (null-value) rows
/// and the artificial start/end nodes.
fn group_rows<'a>(
    rows: &'a [ActivityRow],
    scale: &Scale,
    skip: &[ActivityId],
) -> BTreeMap<ActivityId, Vec<(f64, VisualValue)>> {
    let mut grouped: BTreeMap<ActivityId, Vec<(f64, VisualValue)>> = BTreeMap::new();
    for row in rows {
        if skip.contains(&row.activity) {
            continue;
        }
        let Some(value) = &row.value else { continue };
        grouped
            .entry(row.activity)
            .or_default()
            .push((row.time_secs(), scale.map(value)));
    }
    grouped
}

/// Build the per-node attribute schedules for every animated activity.
///
/// Channels whose rows are all placeholders contribute nothing; a node that
/// ends up with no writes on any channel is omitted from the result.
pub fn animate_activities(
    def: &AnimationDef,
    scales: &Scales,
) -> Vec<(ActivityId, ActivitySchedules)> {
    let skip: Vec<ActivityId> = def
        .start_activity
        .into_iter()
        .chain(def.end_activity)
        .collect();

    let fills = group_rows(&def.act_colors, &scales.act_color, &skip);
    let strokes = group_rows(&def.act_linecolors, &scales.act_linecolor, &skip);
    let opacities = group_rows(&def.act_opacities, &scales.act_opacity, &skip);

    let mut ids: Vec<ActivityId> = fills
        .keys()
        .chain(strokes.keys())
        .chain(opacities.keys())
        .copied()
        .collect();
    ids.sort();
    ids.dedup();

    let mut out = Vec::with_capacity(ids.len());
    for id in ids {
        let fill_changes = fills.get(&id).cloned().unwrap_or_default();

        // Each fill change drags a contrast label color along with it.
        let text_changes: Vec<(f64, VisualValue)> = fill_changes
            .iter()
            .filter_map(|(t, v)| match v {
                VisualValue::Color(c) => {
                    Some((*t, VisualValue::Color(contrast_text_fill(*c))))
                }
                _ => None,
            })
            .collect();

        let schedules = ActivitySchedules {
            fill: AttributeSchedule::build(fill_changes, false),
            text_fill: AttributeSchedule::build(text_changes, false),
            stroke: AttributeSchedule::build(
                strokes.get(&id).cloned().unwrap_or_default(),
                false,
            ),
            opacity: AttributeSchedule::build(
                opacities.get(&id).cloned().unwrap_or_default(),
                false,
            ),
        };
        if !schedules.is_empty() {
            out.push((id, schedules));
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/anim/activity.rs"]
mod tests;
