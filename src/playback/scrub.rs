/// A time value in the units the playback control displays.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DisplayTime {
    /// Domain seconds relative to the timeline start.
    Relative(f64),
    /// Absolute wall-clock time in epoch milliseconds.
    Absolute(i64),
}

/// The host's scrub slider.
///
/// This is the silent path: the session pushes clock progress into the
/// display without triggering the control's own change handling. User drags
/// come back in through [`crate::PlaybackSession::user_scrub`] instead, so
/// the two directions can never feed back into each other.
pub trait ScrubControl {
    /// Update the displayed position.
    fn set_display_value(&mut self, value: DisplayTime);
}

/// Receiver for coarse-grained playback progress.
///
/// Called once per repeat tick with the clamped, domain-mapped time; hosts
/// forward this to reactive listeners.
pub trait TimeObserver {
    /// Report the current domain time.
    fn on_time(&mut self, domain_time: f64);
}
