//! Smooth scroll emulator.
//!
//! Intercepts raw wheel/touch deltas, keeps a virtual offset lagging the raw
//! target with exponential smoothing, and is the single authority other
//! components query for the current scroll position. The virtual offset is
//! what the host applies as a transform to the scrollable root, so virtual
//! and visual position agree and the browser-style instant jump is
//! suppressed.

use crate::foundation::core::ScrollDirection;
use crate::foundation::math::smoothing_alpha;
use crate::scroll::state::ScrollState;

/// Below this remaining gap (px) the virtual offset snaps to the raw target.
const SNAP_EPS: f64 = 1e-3;

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmootherConfig {
    /// Smoothing window in seconds; the gap to the raw target decays to
    /// ~0.1% over this span regardless of frame rate.
    pub duration: f64,
    pub wheel_multiplier: f64,
    pub touch_multiplier: f64,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            duration: 1.4,
            wheel_multiplier: 1.0,
            touch_multiplier: 2.0,
        }
    }
}

/// Owns and updates the session's [`ScrollState`], once per frame.
#[derive(Clone, Debug)]
pub struct ScrollSmoother {
    config: SmootherConfig,
    state: ScrollState,
    max_offset: f64,
}

impl ScrollSmoother {
    pub fn new(config: SmootherConfig, max_offset: f64) -> Self {
        Self {
            config,
            state: ScrollState::default(),
            max_offset: max_offset.max(0.0),
        }
    }

    pub fn state(&self) -> &ScrollState {
        &self.state
    }

    pub fn virtual_offset(&self) -> f64 {
        self.state.virtual_offset
    }

    pub fn velocity(&self) -> f64 {
        self.state.velocity
    }

    /// Scrollable range changed (resize, content growth). The raw target is
    /// re-clamped; the virtual offset converges normally.
    pub fn set_max_offset(&mut self, max_offset: f64) {
        self.max_offset = max_offset.max(0.0);
        self.state.raw_offset = self.state.raw_offset.clamp(0.0, self.max_offset);
    }

    pub fn add_wheel(&mut self, delta_y: f64) {
        self.push_delta(delta_y * self.config.wheel_multiplier);
    }

    pub fn add_touch(&mut self, delta_y: f64) {
        self.push_delta(delta_y * self.config.touch_multiplier);
    }

    /// Jump the raw target (anchor navigation). `immediate` also moves the
    /// virtual offset, skipping the glide.
    pub fn scroll_to(&mut self, offset: f64, immediate: bool) {
        self.state.raw_offset = offset.clamp(0.0, self.max_offset);
        if immediate {
            self.state.virtual_offset = self.state.raw_offset;
            self.state.velocity = 0.0;
            self.state.direction = ScrollDirection::Still;
        }
    }

    fn push_delta(&mut self, delta: f64) {
        self.state.raw_offset = (self.state.raw_offset + delta).clamp(0.0, self.max_offset);
    }

    /// Advance the virtual offset one frame. Zero or negative `dt` (tab
    /// hidden, timer stall) skips the update entirely rather than dividing by
    /// zero or applying a runaway step.
    pub fn update(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }

        if self.state.is_settled(SNAP_EPS) {
            if self.state.virtual_offset != self.state.raw_offset {
                self.state.virtual_offset = self.state.raw_offset;
            }
            self.state.velocity = 0.0;
            self.state.direction = ScrollDirection::Still;
            return;
        }

        // alpha < 1 guarantees monotone convergence with no overshoot.
        let alpha = smoothing_alpha(dt, self.config.duration);
        let step = self.state.gap() * alpha;
        self.state.virtual_offset += step;
        self.state.velocity = step / dt;
        self.state.direction = if step > 0.0 {
            ScrollDirection::Down
        } else {
            ScrollDirection::Up
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smoother() -> ScrollSmoother {
        ScrollSmoother::new(SmootherConfig::default(), 10_000.0)
    }

    #[test]
    fn converges_without_overshoot() {
        let mut s = smoother();
        s.add_wheel(1000.0);

        let mut prev = 0.0;
        for _ in 0..600 {
            s.update(1.0 / 60.0);
            let v = s.virtual_offset();
            assert!(v >= prev, "must be monotone");
            assert!(v <= 1000.0, "must not overshoot");
            prev = v;
        }
        assert_eq!(s.virtual_offset(), 1000.0, "snaps once within epsilon");
        assert_eq!(s.state().direction, ScrollDirection::Still);
    }

    #[test]
    fn zero_dt_skips_the_update() {
        let mut s = smoother();
        s.add_wheel(500.0);
        s.update(0.0);
        assert_eq!(s.virtual_offset(), 0.0);
        s.update(-1.0);
        assert_eq!(s.virtual_offset(), 0.0);
    }

    #[test]
    fn raw_target_is_clamped_to_content() {
        let mut s = ScrollSmoother::new(SmootherConfig::default(), 100.0);
        s.add_wheel(1e6);
        assert_eq!(s.state().raw_offset, 100.0);
        s.add_wheel(-1e7);
        assert_eq!(s.state().raw_offset, 0.0);
    }

    #[test]
    fn touch_deltas_use_their_own_multiplier() {
        let mut s = smoother();
        s.add_touch(10.0);
        assert_eq!(s.state().raw_offset, 20.0);
        s.add_wheel(10.0);
        assert_eq!(s.state().raw_offset, 30.0);
    }

    #[test]
    fn scroll_to_immediate_skips_the_glide() {
        let mut s = smoother();
        s.scroll_to(400.0, true);
        assert_eq!(s.virtual_offset(), 400.0);
        assert_eq!(s.velocity(), 0.0);
    }

    #[test]
    fn direction_tracks_travel() {
        let mut s = smoother();
        s.add_wheel(100.0);
        s.update(0.016);
        assert_eq!(s.state().direction, ScrollDirection::Down);

        s.add_wheel(-400.0); // target now well behind the virtual offset
        s.update(0.016);
        assert_eq!(s.state().direction, ScrollDirection::Up);
        assert!(s.velocity() < 0.0);
    }
}
