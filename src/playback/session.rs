//! Playback state machine tying the host clock, scrub control, and time
//! observer together.

use crate::playback::clock::AnimationClock;
use crate::playback::scrub::{DisplayTime, ScrubControl, TimeObserver};
use crate::playback::task::{CooperativeScheduler, TaskFate, TaskHandle};
use crate::scene::payload::{AnimationDef, InitialState, TimelineMode};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Maximum scrub refresh rate, same cap the original slider applies.
const POLL_INTERVAL_MS: f64 = 1000.0 / 18.0;

/// Loop/observer tick interval.
const REPEAT_INTERVAL_MS: f64 = 1000.0;

/// Height the host reserves for an active playback control, in pixels.
const CONTROL_HEIGHT_PX: f64 = 75.0;

/// Lifecycle state of a playback session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Not started, or torn down.
    Uninitialized,
    /// Clock running.
    Playing,
    /// Clock frozen.
    Paused,
}

/// Keyboard commands the playback surface accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// Toggle pause.
    Space,
    /// Seek to `n/10` of the animation.
    Digit(u8),
}

/// Shared handle to the host clock.
pub type SharedClock = Rc<RefCell<dyn AnimationClock>>;
/// Shared handle to the host scrub control.
pub type SharedScrub = Rc<RefCell<dyn ScrubControl>>;
/// Shared handle to the host time observer.
pub type SharedObserver = Rc<RefCell<dyn TimeObserver>>;

/// Playback controller for one animation instance.
///
/// The session owns its task handles and loop counter; nothing about
/// playback lives outside it, so restarting is `start` after `teardown`
/// (and `start` performs the teardown itself).
pub struct PlaybackSession {
    duration: f64,
    timeline: bool,
    timeline_start: f64,
    mode: TimelineMode,
    factor: f64,
    repeat_count: Option<u32>,
    repeat_delay: f64,
    initial_state: InitialState,
    initial_time: f64,

    clock: SharedClock,
    scrub: Option<SharedScrub>,
    observer: Option<SharedObserver>,

    scheduler: CooperativeScheduler,
    poll_task: Option<TaskHandle>,
    repeat_task: Option<TaskHandle>,
    loop_count: Rc<Cell<u32>>,
    state: PlaybackState,
    enabled: bool,
}

impl PlaybackSession {
    /// Build a session from the payload's playback settings.
    pub fn new(
        def: &AnimationDef,
        clock: SharedClock,
        scrub: Option<SharedScrub>,
        observer: Option<SharedObserver>,
    ) -> Self {
        Self {
            duration: def.duration,
            timeline: def.timeline,
            timeline_start: def.timeline_start,
            mode: def.mode,
            factor: def.factor,
            repeat_count: def.repeat_count,
            repeat_delay: def.repeat_delay,
            initial_state: def.initial_state,
            initial_time: def.initial_time,
            clock,
            scrub,
            observer,
            scheduler: CooperativeScheduler::new(),
            poll_task: None,
            repeat_task: None,
            loop_count: Rc::new(Cell::new(1)),
            state: PlaybackState::Uninitialized,
            enabled: false,
        }
    }

    /// Start (or restart) playback.
    ///
    /// Probes the clock's pause capability first; without it every control
    /// becomes a no-op and no tasks are scheduled. In `Off` mode the control
    /// stays interactive but live clock updates are not scheduled either.
    pub fn start(&mut self) {
        self.teardown();

        if !self.clock.borrow().supports_pause() {
            tracing::debug!("clock cannot pause, playback control disabled");
            return;
        }
        self.enabled = true;

        // Polling serves the scrub display only; looping and the time
        // observer run whether or not a timeline control is shown.
        if self.timeline && self.mode != TimelineMode::Off {
            self.schedule_poll();
        }
        self.schedule_repeat();

        let initial = self.initial_time.clamp(0.0, self.duration);
        {
            let mut clock = self.clock.borrow_mut();
            clock.set_current_time(initial);
            clock.unpause_animations();
        }
        self.state = PlaybackState::Playing;
        if self.initial_state == InitialState::Paused {
            self.pause();
        }
        tracing::debug!(initial, state = ?self.state, "playback session started");
    }

    fn schedule_poll(&mut self) {
        let Some(scrub) = self.scrub.clone() else {
            return;
        };
        let clock = self.clock.clone();
        let duration = self.duration;
        let timeline_start = self.timeline_start;
        let factor = self.factor;
        let mode = self.mode;

        let handle = self.scheduler.schedule(
            POLL_INTERVAL_MS,
            Box::new(move |_now| {
                let (t, paused) = {
                    let c = clock.borrow();
                    (c.current_time(), c.animations_paused())
                };
                if t > 0.0 && t <= duration && !paused {
                    let domain = timeline_start + t * factor;
                    let value = match mode {
                        TimelineMode::Absolute => DisplayTime::Absolute(domain.round() as i64),
                        _ => DisplayTime::Relative(domain),
                    };
                    scrub.borrow_mut().set_display_value(value);
                }
                TaskFate::Continue
            }),
        );
        self.poll_task = Some(handle);
    }

    fn schedule_repeat(&mut self) {
        let clock = self.clock.clone();
        let observer = self.observer.clone();
        let loop_count = self.loop_count.clone();
        let duration = self.duration;
        let timeline_start = self.timeline_start;
        let factor = self.factor;
        let repeat_count = self.repeat_count;
        let repeat_delay = self.repeat_delay;

        let handle = self.scheduler.schedule(
            REPEAT_INTERVAL_MS,
            Box::new(move |_now| {
                let t = clock.borrow().current_time();

                let may_loop = match repeat_count {
                    None => true,
                    Some(n) => loop_count.get() < n,
                };
                if t > duration + repeat_delay && may_loop {
                    clock.borrow_mut().set_current_time(0.0);
                    loop_count.set(loop_count.get() + 1);
                }

                if let Some(obs) = &observer {
                    // Past-the-end overshoot never leaks to listeners.
                    let clamped = t.min(duration);
                    obs.borrow_mut().on_time(timeline_start + clamped * factor);
                }
                TaskFate::Continue
            }),
        );
        self.repeat_task = Some(handle);
    }

    /// Freeze the clock and cancel the scrub polling task. Idempotent; a
    /// no-op before `start`.
    pub fn pause(&mut self) {
        if self.enabled && self.state == PlaybackState::Playing {
            // A paused display has nothing to poll for.
            if let Some(h) = self.poll_task.take() {
                self.scheduler.cancel(h);
            }
            self.clock.borrow_mut().pause_animations();
            self.state = PlaybackState::Paused;
        }
    }

    /// Unfreeze the clock and restart the scrub polling task. Idempotent;
    /// a no-op before `start`.
    pub fn resume(&mut self) {
        if self.enabled && self.state == PlaybackState::Paused {
            self.clock.borrow_mut().unpause_animations();
            if self.timeline && self.mode != TimelineMode::Off {
                self.schedule_poll();
            }
            self.state = PlaybackState::Playing;
        }
    }

    /// Seek to an animation time, clamped to `[0, duration]`. Does not
    /// change the paused/playing state.
    pub fn seek(&mut self, secs: f64) {
        if self.enabled {
            self.clock
                .borrow_mut()
                .set_current_time(secs.clamp(0.0, self.duration));
        }
    }

    /// Handle a user drag of the scrub control: a domain-time value coming
    /// back from the display, mapped onto the animation clock.
    pub fn user_scrub(&mut self, domain_value: f64) {
        if self.factor != 0.0 {
            self.seek((domain_value - self.timeline_start) / self.factor);
        }
    }

    /// Handle a keyboard command.
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Space => match self.state {
                PlaybackState::Playing => self.pause(),
                PlaybackState::Paused => self.resume(),
                PlaybackState::Uninitialized => {}
            },
            Key::Digit(n) => {
                let n = f64::from(n.min(9));
                self.seek(self.duration / 10.0 * n);
            }
        }
    }

    /// Advance the scheduler with the host's monotonic time.
    pub fn drive(&mut self, now_ms: f64) {
        self.scheduler.drive(now_ms);
    }

    /// Current clock position.
    pub fn current_time(&self) -> f64 {
        self.clock.borrow().current_time()
    }

    /// Lifecycle state.
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Completed play-throughs, counting the current one.
    pub fn loop_count(&self) -> u32 {
        self.loop_count.get()
    }

    /// Vertical space the host should reserve for the control.
    pub fn control_height(&self) -> f64 {
        if self.enabled && self.timeline && self.state != PlaybackState::Uninitialized {
            CONTROL_HEIGHT_PX
        } else {
            0.0
        }
    }

    /// Number of live scheduler tasks. Zero when disabled or in `Off` mode.
    pub fn active_tasks(&self) -> usize {
        self.scheduler.active_count()
    }

    /// Cancel tasks and reset to [`PlaybackState::Uninitialized`].
    /// Idempotent; `start` calls this before rebuilding.
    pub fn teardown(&mut self) {
        if let Some(h) = self.poll_task.take() {
            self.scheduler.cancel(h);
        }
        if let Some(h) = self.repeat_task.take() {
            self.scheduler.cancel(h);
        }
        self.loop_count.set(1);
        self.state = PlaybackState::Uninitialized;
        self.enabled = false;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/session.rs"]
mod tests;
