//! Pointer-following cursor decoration: a near-instant "dot" and a laggy
//! "ring", each smoothed toward the live pointer with its own factor.

use crate::effects::EffectCtx;
use crate::engine::host::{Prop, PropertyWrite};
use crate::foundation::core::{ElementId, Point};
use crate::foundation::math::smoothing_alpha;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerFollowerConfig {
    pub dot: ElementId,
    pub ring: ElementId,
    /// Smoothing windows in seconds; the dot is near-instant, the ring lags.
    pub dot_duration: f64,
    pub ring_duration: f64,
    /// Seconds for hover/visibility scale and opacity transitions.
    pub hover_transition: f64,
    pub dot_opacity: f64,
    pub ring_opacity: f64,
    /// Targets while the pointer rests on an interactive element: the dot
    /// grows and fades, the ring shrinks away.
    pub hover_dot_scale: f64,
    pub hover_dot_opacity: f64,
    pub hover_ring_scale: f64,
    pub hover_ring_opacity: f64,
}

impl PointerFollowerConfig {
    pub fn new(dot: ElementId, ring: ElementId) -> Self {
        Self {
            dot,
            ring,
            dot_duration: 0.1,
            ring_duration: 0.35,
            hover_transition: 0.3,
            dot_opacity: 1.0,
            ring_opacity: 0.6,
            hover_dot_scale: 2.5,
            hover_dot_opacity: 0.5,
            hover_ring_scale: 0.5,
            hover_ring_opacity: 0.0,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct PointerFollower {
    config: PointerFollowerConfig,
    dot_pos: Point,
    ring_pos: Point,
    /// Positions snap to the pointer on the first frame it is seen, so the
    /// decoration does not glide in from the origin.
    initialized: bool,
    /// Interactive-element enters may nest (a button inside a hovered card).
    hover_depth: u32,
    pointer_inside: bool,
    dot_scale: f64,
    dot_alpha: f64,
    ring_scale: f64,
    ring_alpha: f64,
}

impl PointerFollower {
    pub(crate) fn new(config: PointerFollowerConfig) -> Self {
        Self {
            dot_pos: Point::ZERO,
            ring_pos: Point::ZERO,
            initialized: false,
            hover_depth: 0,
            pointer_inside: true,
            dot_scale: 1.0,
            dot_alpha: config.dot_opacity,
            ring_scale: 1.0,
            ring_alpha: config.ring_opacity,
            config,
        }
    }

    pub(crate) fn on_interactive_enter(&mut self) {
        self.hover_depth = self.hover_depth.saturating_add(1);
    }

    pub(crate) fn on_interactive_leave(&mut self) {
        self.hover_depth = self.hover_depth.saturating_sub(1);
    }

    pub(crate) fn on_viewport_presence(&mut self, pointer_inside: bool) {
        self.pointer_inside = pointer_inside;
    }

    pub(crate) fn update(&mut self, dt: f64, ctx: EffectCtx<'_>, staged: &mut Vec<PropertyWrite>) {
        if !self.initialized {
            if !ctx.pointer_in_viewport {
                return;
            }
            self.dot_pos = ctx.pointer;
            self.ring_pos = ctx.pointer;
            self.initialized = true;
        }

        let dot_alpha = smoothing_alpha(dt, self.config.dot_duration);
        let ring_alpha = smoothing_alpha(dt, self.config.ring_duration);
        self.dot_pos += (ctx.pointer - self.dot_pos) * dot_alpha;
        self.ring_pos += (ctx.pointer - self.ring_pos) * ring_alpha;

        let hovering = self.hover_depth > 0;
        let (dot_scale_t, dot_alpha_t, ring_scale_t, ring_alpha_t) = if !self.pointer_inside {
            // Pointer left the viewport: hide both, keep scales where they are.
            (self.dot_scale, 0.0, self.ring_scale, 0.0)
        } else if hovering {
            (
                self.config.hover_dot_scale,
                self.config.hover_dot_opacity,
                self.config.hover_ring_scale,
                self.config.hover_ring_opacity,
            )
        } else {
            (1.0, self.config.dot_opacity, 1.0, self.config.ring_opacity)
        };

        let t = smoothing_alpha(dt, self.config.hover_transition);
        self.dot_scale += (dot_scale_t - self.dot_scale) * t;
        self.dot_alpha += (dot_alpha_t - self.dot_alpha) * t;
        self.ring_scale += (ring_scale_t - self.ring_scale) * t;
        self.ring_alpha += (ring_alpha_t - self.ring_alpha) * t;

        staged.push(PropertyWrite::set(self.config.dot, Prop::TranslateX, self.dot_pos.x));
        staged.push(PropertyWrite::set(self.config.dot, Prop::TranslateY, self.dot_pos.y));
        staged.push(PropertyWrite::set(self.config.dot, Prop::Scale, self.dot_scale));
        staged.push(PropertyWrite::set(self.config.dot, Prop::Opacity, self.dot_alpha));
        staged.push(PropertyWrite::set(self.config.ring, Prop::TranslateX, self.ring_pos.x));
        staged.push(PropertyWrite::set(self.config.ring, Prop::TranslateY, self.ring_pos.y));
        staged.push(PropertyWrite::set(self.config.ring, Prop::Scale, self.ring_scale));
        staged.push(PropertyWrite::set(self.config.ring, Prop::Opacity, self.ring_alpha));
    }
}
