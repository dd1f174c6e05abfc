//! Choreo is a scroll-synchronized motion engine.
//!
//! It coordinates continuous visual motion with scroll and pointer input in
//! real time: a smooth-scroll emulator owns the virtual scroll offset, a
//! trigger registry evaluates viewport-relative regions against it every
//! frame, a tween engine drives eased property changes, and a set of
//! continuous effects (pointer follower, magnetic attraction, marquees, idle
//! float) runs free of the scroll. A single frame scheduler owns the
//! ordering: input smoothing, trigger evaluation, tween/effect advancement,
//! then one commit of all property writes.
//!
//! The public API is session-oriented:
//!
//! - Build an [`Engine`] (optionally from a declarative [`SceneDef`])
//! - Feed it [`InputEvent`]s and call [`Engine::frame`] once per frame
//! - Read committed element properties back from the element store
#![forbid(unsafe_code)]

pub mod animation;
pub mod counter;
pub mod effects;
pub mod engine;
pub mod foundation;
pub mod scene;
pub mod scroll;
pub mod trigger;

pub use crate::foundation::core::{ElementId, Point, Rect, ScrollDirection, Vec2, Viewport};
pub use crate::foundation::error::{ChoreoError, ChoreoResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{PropTrack, TweenDriver, TweenSpec};
pub use crate::effects::EffectConfig;
pub use crate::engine::host::{ElementProps, InputEvent, Prop, PropertyWrite};
pub use crate::engine::scheduler::{Engine, EngineConfig, FrameStats};
pub use crate::scene::build::build_scene;
pub use crate::scene::model::SceneDef;
pub use crate::scroll::smoother::SmootherConfig;
pub use crate::scroll::state::ScrollState;
pub use crate::trigger::registry::Edge;
