//! Procanim compiles discrete-entity ("token") movement records into a
//! declarative animation schedule and keeps an external playback control in
//! sync with the animation clock.
//!
//! The crate is renderer-agnostic. The public API is payload-oriented:
//!
//! - Parse and validate an [`AnimationDef`] payload
//! - Build the channel [`Scales`]
//! - Compile per-case moves into a [`CompiledAnimation`]
//! - Drive a [`PlaybackSession`] against the host's clock and scrub control
//!
//! Graph layout, rendering, and DOM event wiring stay on the host side; the
//! compiled descriptors and the playback traits are the only contact points.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Attribute animator: sparse timed changes into set-event schedules.
pub mod anim;
/// Timeline compiler and compiled descriptor model.
pub mod compile;
/// Playback session, cooperative task scheduler, and host-facing traits.
pub mod playback;
/// Value-to-visual scale construction.
pub mod scales;
/// Boundary payload and graph geometry inputs.
pub mod scene;

pub use crate::foundation::core::{ActivityId, EdgeId, Point, Rgba8};
pub use crate::foundation::error::{ProcanimError, ProcanimResult};

pub use crate::anim::attr::{AttributeSchedule, SetEvent};
pub use crate::anim::activity::{ActivitySchedules, animate_activities, contrast_text_fill};
pub use crate::compile::compiler::compile_animation;
pub use crate::compile::descriptor::{
    ActivityDescriptor, AttrTimeline, CompiledAnimation, MotionSegment, TargetAttr,
    TokenDescriptor, Visibility,
};
pub use crate::compile::fingerprint::{AnimationFingerprint, fingerprint_animation};
pub use crate::playback::clock::AnimationClock;
pub use crate::playback::scrub::{DisplayTime, ScrubControl, TimeObserver};
pub use crate::playback::session::{
    Key, PlaybackSession, PlaybackState, SharedClock, SharedObserver, SharedScrub,
};
pub use crate::playback::task::{CooperativeScheduler, TaskFate, TaskHandle};
pub use crate::scales::build::{Scale, ScaleKind, ScaleSpec, Scales};
pub use crate::scales::value::{ChannelValue, VisualValue};
pub use crate::scene::graph::{EdgeGeometry, GraphGeometry};
pub use crate::scene::payload::{
    ActivityRow, AnimationDef, ChannelRow, InitialState, TimelineMode, TokenRow, TokenShape,
};
