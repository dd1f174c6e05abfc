//! Continuous effects: free-running per-frame behaviors that are never
//! scroll-gated. Each advances every frame from registration until disposed.

pub mod cursor;
pub mod float;
pub mod magnetic;
pub mod marquee;

use crate::engine::host::{ElementStore, PropertyWrite};
use crate::foundation::core::{ElementId, Point};
use crate::foundation::error::ChoreoResult;

pub use cursor::PointerFollowerConfig;
pub use float::IdleFloatConfig;
pub use magnetic::MagneticConfig;
pub use marquee::MarqueeConfig;

/// Per-frame inputs shared by every effect.
#[derive(Clone, Copy, Debug)]
pub(crate) struct EffectCtx<'a> {
    /// Live pointer position in viewport coordinates.
    pub(crate) pointer: Point,
    pub(crate) pointer_in_viewport: bool,
    /// Current virtual scroll offset (document y of the viewport top).
    pub(crate) scroll_offset: f64,
    pub(crate) store: &'a ElementStore,
}

/// Configuration for one continuous effect.
#[derive(Clone, Debug)]
pub enum EffectConfig {
    PointerFollower(PointerFollowerConfig),
    Magnetic(MagneticConfig),
    Marquee(MarqueeConfig),
    IdleFloat(IdleFloatConfig),
}

/// A live effect in the scheduler's arena, dispatched as a tagged variant.
#[derive(Clone, Debug)]
pub(crate) enum Effect {
    PointerFollower(cursor::PointerFollower),
    Magnetic(magnetic::Magnetic),
    Marquee(marquee::Marquee),
    IdleFloat(float::IdleFloat),
}

impl EffectConfig {
    pub(crate) fn build(self, store: &ElementStore) -> ChoreoResult<Effect> {
        Ok(match self {
            Self::PointerFollower(config) => {
                Effect::PointerFollower(cursor::PointerFollower::new(config))
            }
            Self::Magnetic(config) => Effect::Magnetic(magnetic::Magnetic::new(config)),
            Self::Marquee(config) => Effect::Marquee(marquee::Marquee::new(config, store)?),
            Self::IdleFloat(config) => Effect::IdleFloat(float::IdleFloat::new(config)),
        })
    }
}

impl Effect {
    pub(crate) fn update(&mut self, dt: f64, ctx: EffectCtx<'_>, staged: &mut Vec<PropertyWrite>) {
        match self {
            Self::PointerFollower(e) => e.update(dt, ctx, staged),
            Self::Magnetic(e) => e.update(dt, ctx, staged),
            Self::Marquee(e) => e.update(dt, staged),
            Self::IdleFloat(e) => e.update(dt, staged),
        }
    }

    pub(crate) fn on_pointer_over(&mut self, element: ElementId, interactive: bool) {
        match self {
            Self::PointerFollower(e) => {
                if interactive {
                    e.on_interactive_enter();
                }
            }
            Self::Magnetic(e) => e.on_pointer_over(element),
            Self::Marquee(_) | Self::IdleFloat(_) => {}
        }
    }

    pub(crate) fn on_pointer_out(&mut self, element: ElementId, interactive: bool) {
        match self {
            Self::PointerFollower(e) => {
                if interactive {
                    e.on_interactive_leave();
                }
            }
            Self::Magnetic(e) => e.on_pointer_out(element),
            Self::Marquee(_) | Self::IdleFloat(_) => {}
        }
    }

    pub(crate) fn on_viewport_presence(&mut self, pointer_inside: bool) {
        if let Self::PointerFollower(e) = self {
            e.on_viewport_presence(pointer_inside);
        }
    }

    pub(crate) fn on_layout_invalidated(&mut self, store: &ElementStore) {
        if let Self::Marquee(e) = self {
            e.on_layout_invalidated(store);
        }
    }
}
