use super::*;
use crate::playback::clock::AnimationClock;
use crate::playback::scrub::{DisplayTime, ScrubControl, TimeObserver};

#[derive(Default)]
struct MockClock {
    time: f64,
    paused: bool,
    can_pause: bool,
    seeks: Vec<f64>,
}

impl MockClock {
    fn pausable() -> Self {
        Self {
            can_pause: true,
            ..Self::default()
        }
    }
}

impl AnimationClock for MockClock {
    fn set_current_time(&mut self, secs: f64) {
        self.time = secs;
        self.seeks.push(secs);
    }
    fn current_time(&self) -> f64 {
        self.time
    }
    fn pause_animations(&mut self) {
        self.paused = true;
    }
    fn unpause_animations(&mut self) {
        self.paused = false;
    }
    fn animations_paused(&self) -> bool {
        self.paused
    }
    fn supports_pause(&self) -> bool {
        self.can_pause
    }
}

#[derive(Default)]
struct MockScrub {
    values: Vec<DisplayTime>,
}

impl ScrubControl for MockScrub {
    fn set_display_value(&mut self, value: DisplayTime) {
        self.values.push(value);
    }
}

#[derive(Default)]
struct MockObserver {
    times: Vec<f64>,
}

impl TimeObserver for MockObserver {
    fn on_time(&mut self, domain_time: f64) {
        self.times.push(domain_time);
    }
}

fn def_json(extra: &str) -> AnimationDef {
    let json = format!(
        r#"{{ "duration": 10.0, "timeline": true, "factor": 2.0, "timeline_start": 100.0 {extra} }}"#
    );
    serde_json::from_str(&json).unwrap()
}

struct Harness {
    session: PlaybackSession,
    clock: Rc<RefCell<MockClock>>,
    scrub: Rc<RefCell<MockScrub>>,
    observer: Rc<RefCell<MockObserver>>,
}

fn harness(def: &AnimationDef, clock: MockClock) -> Harness {
    let clock = Rc::new(RefCell::new(clock));
    let scrub = Rc::new(RefCell::new(MockScrub::default()));
    let observer = Rc::new(RefCell::new(MockObserver::default()));
    let session = PlaybackSession::new(
        def,
        clock.clone(),
        Some(scrub.clone()),
        Some(observer.clone()),
    );
    Harness {
        session,
        clock,
        scrub,
        observer,
    }
}

#[test]
fn start_schedules_both_tasks_and_seeks() {
    let def = def_json(r#", "initial_time": 3.0"#);
    let mut h = harness(&def, MockClock::pausable());

    h.session.start();
    assert_eq!(h.session.state(), PlaybackState::Playing);
    assert_eq!(h.session.active_tasks(), 2);
    assert_eq!(h.clock.borrow().time, 3.0);
    assert_eq!(h.session.control_height(), 75.0);
}

#[test]
fn initial_time_clamps_to_the_duration() {
    let def = def_json(r#", "initial_time": 99.0"#);
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();
    assert_eq!(h.clock.borrow().time, 10.0);
}

#[test]
fn unpausable_clock_disables_everything() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::default());

    h.session.start();
    assert_eq!(h.session.state(), PlaybackState::Uninitialized);
    assert_eq!(h.session.active_tasks(), 0);
    assert_eq!(h.session.control_height(), 0.0);

    // Every control is a no-op.
    h.session.pause();
    h.session.seek(5.0);
    h.session.handle_key(Key::Space);
    assert!(h.clock.borrow().seeks.is_empty());
}

#[test]
fn off_mode_renders_the_control_without_polling() {
    let def = def_json(r#", "mode": "off""#);
    let mut h = harness(&def, MockClock::pausable());

    h.session.start();
    assert_eq!(h.session.state(), PlaybackState::Playing);
    // Only the repeat task; the scrub display is never polled.
    assert_eq!(h.session.active_tasks(), 1);
    assert_eq!(h.session.control_height(), 75.0);

    h.clock.borrow_mut().time = 4.0;
    h.session.drive(0.0);
    h.session.drive(5000.0);
    assert!(h.scrub.borrow().values.is_empty());
}

#[test]
fn pause_and_resume_are_idempotent() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    h.session.pause();
    h.session.pause();
    assert_eq!(h.session.state(), PlaybackState::Paused);
    assert!(h.clock.borrow().paused);
    // Pausing retires the poll task; the repeat task stays.
    assert_eq!(h.session.active_tasks(), 1);

    h.session.resume();
    h.session.resume();
    assert_eq!(h.session.state(), PlaybackState::Playing);
    assert!(!h.clock.borrow().paused);
    assert_eq!(h.session.active_tasks(), 2);
}

#[test]
fn paused_sessions_never_poll_the_scrub() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    h.session.pause();
    h.session.pause();
    assert_eq!(h.session.active_tasks(), 1);

    // Even with the clock inside the push window, nothing polls.
    h.clock.borrow_mut().time = 4.0;
    h.clock.borrow_mut().paused = false;
    h.session.drive(0.0);
    h.session.drive(1_000.0);
    assert!(h.scrub.borrow().values.is_empty());

    h.session.resume();
    h.session.drive(2_000.0);
    assert_eq!(h.scrub.borrow().values.len(), 1);
}

#[test]
fn initial_paused_state_freezes_the_clock() {
    let def = def_json(r#", "initial_state": "paused""#);
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();
    assert_eq!(h.session.state(), PlaybackState::Paused);
    assert!(h.clock.borrow().paused);
    // Starting paused leaves only the repeat task scheduled.
    assert_eq!(h.session.active_tasks(), 1);
}

#[test]
fn looping_does_not_need_the_timeline_control() {
    let def: AnimationDef =
        serde_json::from_str(r#"{ "duration": 10.0, "repeat_count": 2 }"#).unwrap();
    let mut h = harness(&def, MockClock::pausable());

    h.session.start();
    // No control, no polling, but the loop task runs.
    assert_eq!(h.session.control_height(), 0.0);
    assert_eq!(h.session.active_tasks(), 1);

    h.clock.borrow_mut().seeks.clear();
    h.clock.borrow_mut().time = 10.5;
    h.session.drive(1_000.0);
    assert_eq!(h.clock.borrow().seeks, vec![0.0]);
    assert_eq!(h.session.loop_count(), 2);
}

#[test]
fn poll_pushes_domain_time_while_playing() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    h.clock.borrow_mut().time = 4.0;
    h.session.drive(0.0);

    // timeline_start + t * factor = 100 + 4 * 2.
    assert_eq!(
        h.scrub.borrow().values.last(),
        Some(&DisplayTime::Relative(108.0))
    );
}

#[test]
fn poll_is_silent_when_paused_or_out_of_range() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    // t == 0 is out of the push window.
    h.clock.borrow_mut().time = 0.0;
    h.session.drive(0.0);

    // Paused clocks do not push.
    h.clock.borrow_mut().time = 4.0;
    h.session.pause();
    h.session.drive(100.0);

    // Past the end does not push either.
    h.session.resume();
    h.clock.borrow_mut().time = 10.5;
    h.session.drive(200.0);

    assert!(h.scrub.borrow().values.is_empty());
}

#[test]
fn absolute_mode_pushes_epoch_millis() {
    let def = def_json(r#", "mode": "absolute""#);
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    h.clock.borrow_mut().time = 4.0;
    h.session.drive(0.0);
    assert_eq!(
        h.scrub.borrow().values.last(),
        Some(&DisplayTime::Absolute(108))
    );
}

#[test]
fn repeat_loops_until_the_count_is_exhausted() {
    let def = def_json(r#", "repeat_count": 3, "repeat_delay": 1.0"#);
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();
    h.clock.borrow_mut().seeks.clear();

    // Three passes over the end: loops twice (count starts at 1), then stops.
    for tick in 0..3 {
        h.clock.borrow_mut().time = 11.5;
        h.session.drive(1_000.0 + f64::from(tick) * 1_000.0);
    }

    let reseeks: Vec<f64> = h
        .clock
        .borrow()
        .seeks
        .iter()
        .copied()
        .filter(|s| *s == 0.0)
        .collect();
    assert_eq!(reseeks.len(), 2);
    assert_eq!(h.session.loop_count(), 3);
}

#[test]
fn repeat_waits_for_the_delay() {
    let def = def_json(r#", "repeat_delay": 5.0"#);
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();
    h.clock.borrow_mut().seeks.clear();

    // Past the end but inside the delay window.
    h.clock.borrow_mut().time = 12.0;
    h.session.drive(1_000.0);
    assert!(h.clock.borrow().seeks.is_empty());

    h.clock.borrow_mut().time = 15.5;
    h.session.drive(2_000.0);
    assert_eq!(h.clock.borrow().seeks, vec![0.0]);
}

#[test]
fn observer_time_is_clamped_to_the_duration() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    h.clock.borrow_mut().time = 25.0;
    h.session.drive(0.0);

    // Clamped to duration 10, mapped: 100 + 10 * 2.
    assert_eq!(h.observer.borrow().times.last(), Some(&120.0));
}

#[test]
fn user_scrub_maps_domain_time_back_to_the_clock() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    // (108 - 100) / 2 = 4 animation seconds.
    h.session.user_scrub(108.0);
    assert_eq!(h.clock.borrow().time, 4.0);

    // Domain values past the end clamp like any other seek.
    h.session.user_scrub(1_000.0);
    assert_eq!(h.clock.borrow().time, 10.0);
}

#[test]
fn space_toggles_and_digits_seek() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();

    h.session.handle_key(Key::Space);
    assert_eq!(h.session.state(), PlaybackState::Paused);
    h.session.handle_key(Key::Space);
    assert_eq!(h.session.state(), PlaybackState::Playing);

    h.session.handle_key(Key::Digit(7));
    assert_eq!(h.clock.borrow().time, 7.0);
    h.session.handle_key(Key::Digit(0));
    assert_eq!(h.clock.borrow().time, 0.0);
}

#[test]
fn teardown_is_idempotent_and_start_restarts() {
    let def = def_json("");
    let mut h = harness(&def, MockClock::pausable());
    h.session.start();
    assert_eq!(h.session.active_tasks(), 2);

    h.session.teardown();
    h.session.teardown();
    assert_eq!(h.session.state(), PlaybackState::Uninitialized);
    assert_eq!(h.session.active_tasks(), 0);
    assert_eq!(h.session.loop_count(), 1);

    // Restart from scratch, including via start's own teardown.
    h.session.start();
    h.session.start();
    assert_eq!(h.session.active_tasks(), 2);
    assert_eq!(h.session.state(), PlaybackState::Playing);
}
