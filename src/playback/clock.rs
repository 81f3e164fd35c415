/// Host-side animation clock the playback session drives.
///
/// On a DOM host this wraps the SVG document's current-time API; in tests a
/// plain struct suffices. All times are animation seconds.
pub trait AnimationClock {
    /// Seek the clock.
    fn set_current_time(&mut self, secs: f64);

    /// Current clock position.
    fn current_time(&self) -> f64;

    /// Freeze the clock.
    fn pause_animations(&mut self);

    /// Resume a frozen clock.
    fn unpause_animations(&mut self);

    /// Whether the clock is currently frozen.
    fn animations_paused(&self) -> bool;

    /// Capability probe. Hosts whose animation engine cannot pause return
    /// `false`; the session then disables the whole playback control rather
    /// than exposing controls that silently do nothing.
    fn supports_pause(&self) -> bool;
}
