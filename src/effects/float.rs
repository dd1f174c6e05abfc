//! Idle float: a small continuous vertical oscillation with a per-element
//! phase and amplitude so grouped elements never move in visible unison.

use crate::engine::host::{Prop, PropertyWrite};
use crate::foundation::core::ElementId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IdleFloatConfig {
    pub element: ElementId,
    /// Peak vertical displacement in px.
    pub amplitude: f64,
    /// Full oscillation period in seconds.
    pub period: f64,
    /// Phase offset in radians.
    pub phase: f64,
}

impl IdleFloatConfig {
    pub fn new(element: ElementId, amplitude: f64, period: f64) -> Self {
        Self {
            element,
            amplitude,
            period,
            phase: 0.0,
        }
    }

    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }
}

#[derive(Clone, Debug)]
pub(crate) struct IdleFloat {
    config: IdleFloatConfig,
    elapsed: f64,
}

impl IdleFloat {
    pub(crate) fn new(config: IdleFloatConfig) -> Self {
        Self {
            config,
            elapsed: 0.0,
        }
    }

    pub(crate) fn update(&mut self, dt: f64, staged: &mut Vec<PropertyWrite>) {
        if self.config.period <= 0.0 {
            return;
        }
        self.elapsed += dt.max(0.0);
        let angle = std::f64::consts::TAU * self.elapsed / self.config.period + self.config.phase;
        staged.push(PropertyWrite::set(
            self.config.element,
            Prop::TranslateY,
            self.config.amplitude * angle.sin(),
        ));
    }
}
