//! Magnetic attractor: displaces a bound element toward the pointer while
//! hovered, and springs back to rest with an elastic ease on leave.

use crate::animation::ease::Ease;
use crate::effects::EffectCtx;
use crate::engine::host::{Prop, PropertyWrite};
use crate::foundation::core::{ElementId, Vec2};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MagneticConfig {
    pub element: ElementId,
    /// Fraction of the pointer's offset from the element center applied as
    /// displacement.
    pub attraction: f64,
    /// Spring-back duration in seconds.
    pub release_duration: f64,
    pub release_ease: Ease,
}

impl MagneticConfig {
    pub fn new(element: ElementId) -> Self {
        Self {
            element,
            attraction: 0.3,
            release_duration: 0.6,
            release_ease: Ease::OutElastic,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Mode {
    Idle,
    Tracking,
    Releasing { from: Vec2, elapsed: f64 },
}

#[derive(Clone, Debug)]
pub(crate) struct Magnetic {
    config: MagneticConfig,
    mode: Mode,
    displacement: Vec2,
}

impl Magnetic {
    pub(crate) fn new(config: MagneticConfig) -> Self {
        Self {
            config,
            mode: Mode::Idle,
            displacement: Vec2::ZERO,
        }
    }

    pub(crate) fn on_pointer_over(&mut self, element: ElementId) {
        if element == self.config.element {
            self.mode = Mode::Tracking;
        }
    }

    pub(crate) fn on_pointer_out(&mut self, element: ElementId) {
        if element == self.config.element && self.mode == Mode::Tracking {
            self.mode = Mode::Releasing {
                from: self.displacement,
                elapsed: 0.0,
            };
        }
    }

    pub(crate) fn update(&mut self, dt: f64, ctx: EffectCtx<'_>, staged: &mut Vec<PropertyWrite>) {
        match self.mode {
            Mode::Idle => {}
            Mode::Tracking => {
                let Ok(center) = ctx.store.center(self.config.element) else {
                    return;
                };
                // Element center in viewport coordinates.
                let center = Vec2::new(center.x, center.y - ctx.scroll_offset);
                let offset = ctx.pointer.to_vec2() - center;
                self.displacement = offset * self.config.attraction;
                self.stage(staged);
            }
            Mode::Releasing { from, elapsed } => {
                let elapsed = elapsed + dt.max(0.0);
                let duration = self.config.release_duration;
                let t = if duration <= 0.0 {
                    1.0
                } else {
                    (elapsed / duration).min(1.0)
                };
                // The elastic ease overshoots past 1, so the displacement
                // oscillates through zero on the way to rest.
                let eased = self.config.release_ease.apply(t);
                self.displacement = from * (1.0 - eased);
                self.stage(staged);
                self.mode = if t >= 1.0 {
                    self.displacement = Vec2::ZERO;
                    Mode::Idle
                } else {
                    Mode::Releasing { from, elapsed }
                };
            }
        }
    }

    fn stage(&self, staged: &mut Vec<PropertyWrite>) {
        staged.push(PropertyWrite::set(
            self.config.element,
            Prop::TranslateX,
            self.displacement.x,
        ));
        staged.push(PropertyWrite::set(
            self.config.element,
            Prop::TranslateY,
            self.displacement.y,
        ));
    }
}
