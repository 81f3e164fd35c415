use crate::scales::value::VisualValue;
use smallvec::SmallVec;

/// One discrete attribute write at a point on the animation clock.
///
/// Set-events freeze: the value holds from `time` until the next event on
/// the same attribute overrides it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SetEvent {
    /// Animation time of the write, in seconds.
    pub time: f64,
    /// Value written into the attribute.
    pub value: VisualValue,
}

/// Compiled schedule for one attribute of one element.
///
/// A static attribute compiles to a baseline with no events; a genuinely
/// animated one carries its changes as freeze-semantics set-events.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AttributeSchedule {
    /// Value applied before any event fires, or at element creation.
    pub baseline: Option<VisualValue>,
    /// Timed writes, ascending by time.
    pub events: SmallVec<[SetEvent; 4]>,
}

impl AttributeSchedule {
    /// Build a schedule from scale-mapped changes.
    ///
    /// Changes need not arrive sorted. A single change at time zero
    /// collapses to a baseline: the value never varies, so emitting an
    /// event for it would only cost the renderer a no-op write per pass.
    /// With `first_is_baseline` the earliest change always becomes the
    /// baseline regardless of its time; image hrefs use this because the
    /// initial value must be present at element creation for the resource
    /// to load.
    pub fn build(
        changes: impl IntoIterator<Item = (f64, VisualValue)>,
        first_is_baseline: bool,
    ) -> Self {
        let mut changes: Vec<(f64, VisualValue)> = changes.into_iter().collect();
        changes.sort_by(|a, b| a.0.total_cmp(&b.0));

        if changes.is_empty() {
            return Self::default();
        }
        if changes.len() == 1 && changes[0].0 == 0.0 {
            return Self {
                baseline: Some(changes.remove(0).1),
                events: SmallVec::new(),
            };
        }

        let mut baseline = None;
        let mut rest = changes.into_iter();
        if first_is_baseline {
            baseline = rest.next().map(|(_, v)| v);
        }
        let events = rest
            .map(|(time, value)| SetEvent { time, value })
            .collect();
        Self { baseline, events }
    }

    /// Whether the schedule writes anything at all.
    pub fn is_empty(&self) -> bool {
        self.baseline.is_none() && self.events.is_empty()
    }

    /// Effective value at time `t` under freeze semantics.
    pub fn value_at(&self, t: f64) -> Option<&VisualValue> {
        self.events
            .iter()
            .take_while(|e| e.time <= t)
            .last()
            .map(|e| &e.value)
            .or(self.baseline.as_ref())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/anim/attr.rs"]
mod tests;
