/// Activity-node channel animation.
pub mod activity;
/// Attribute schedules with freeze-semantics set-events.
pub mod attr;
