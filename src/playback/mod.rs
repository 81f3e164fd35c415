/// Host clock trait.
pub mod clock;
/// Scrub control and time observer traits.
pub mod scrub;
/// The playback session state machine.
pub mod session;
/// Cancellable cooperative interval tasks.
pub mod task;
