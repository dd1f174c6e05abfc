//! Tween engine: eased, time-bounded or scroll-progress-bounded property
//! changes.
//!
//! A tween is either driven by wall-clock time (its progress derives from
//! elapsed time, never from accumulated per-frame increments, so frame drops
//! cannot change where it ends) or by an externally supplied progress value
//! (a scrub trigger feeds it and the tween is a pure function of that value).

use smallvec::SmallVec;

use crate::animation::ease::Ease;
use crate::animation::lerp::Lerp;
use crate::engine::host::{Prop, PropertyWrite};
use crate::foundation::core::ElementId;
use crate::foundation::error::{ChoreoError, ChoreoResult};

/// What advances a tween.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TweenDriver {
    /// Wall-clock time; `duration` in seconds. Zero resolves instantly.
    Time { duration: f64 },
    /// Externally supplied progress in `[0, 1]` (scroll scrub).
    Progress,
}

/// One animated property with its endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropTrack {
    pub prop: Prop,
    pub from: f64,
    pub to: f64,
}

/// Declarative description of a tween.
#[derive(Clone, Debug)]
pub struct TweenSpec {
    pub target: ElementId,
    pub tracks: SmallVec<[PropTrack; 2]>,
    pub driver: TweenDriver,
    pub ease: Ease,
    /// Start delay in seconds (time-driven only).
    pub delay: f64,
    /// Extra cycles after the first: `0` plays once, `-1` repeats forever.
    pub repeat: i32,
    /// Reverse direction on every other cycle.
    pub yoyo: bool,
}

impl TweenSpec {
    /// A time-driven tween over `duration` seconds.
    pub fn over(target: ElementId, duration: f64) -> Self {
        Self {
            target,
            tracks: SmallVec::new(),
            driver: TweenDriver::Time { duration },
            ease: Ease::Linear,
            delay: 0.0,
            repeat: 0,
            yoyo: false,
        }
    }

    /// A progress-driven tween, advanced by a scrub trigger.
    pub fn scrubbed(target: ElementId) -> Self {
        Self {
            target,
            tracks: SmallVec::new(),
            driver: TweenDriver::Progress,
            ease: Ease::Linear,
            delay: 0.0,
            repeat: 0,
            yoyo: false,
        }
    }

    pub fn with_track(mut self, prop: Prop, from: f64, to: f64) -> Self {
        self.tracks.push(PropTrack { prop, from, to });
        self
    }

    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_repeat(mut self, repeat: i32, yoyo: bool) -> Self {
        self.repeat = repeat;
        self.yoyo = yoyo;
        self
    }

    pub fn validate(&self) -> ChoreoResult<()> {
        if let TweenDriver::Time { duration } = self.driver {
            if duration < 0.0 || !duration.is_finite() {
                return Err(ChoreoError::config("tween duration must be finite and >= 0"));
            }
        }
        if self.repeat < -1 {
            return Err(ChoreoError::config("tween repeat must be >= -1"));
        }
        if self.delay < 0.0 || !self.delay.is_finite() {
            return Err(ChoreoError::config("tween delay must be finite and >= 0"));
        }
        if self.tracks.is_empty() {
            return Err(ChoreoError::config("tween has no property tracks"));
        }
        Ok(())
    }
}

/// Apply a per-index delay offset across a list of otherwise-identical
/// tweens: item `i` gets `base + i * step`. Start times are strictly
/// increasing for `step > 0`.
pub fn staggered(specs: Vec<TweenSpec>, base: f64, step: f64) -> Vec<TweenSpec> {
    specs
        .into_iter()
        .enumerate()
        .map(|(i, mut spec)| {
            spec.delay = base + i as f64 * step;
            spec
        })
        .collect()
}

/// A live tween. Owned by the engine's arena; tests may drive one directly.
#[derive(Clone, Debug)]
pub struct Tween {
    spec: TweenSpec,
    elapsed: f64,
    progress: f64,
    progress_dirty: bool,
    started: bool,
    done: bool,
}

impl Tween {
    pub fn new(spec: TweenSpec) -> Self {
        Self {
            spec,
            elapsed: 0.0,
            progress: 0.0,
            progress_dirty: false,
            started: false,
            done: false,
        }
    }

    pub fn spec(&self) -> &TweenSpec {
        &self.spec
    }

    /// Terminal for finite time-driven tweens; a `repeat = -1` tween never
    /// reaches this until canceled.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the tween has produced its first write (delay elapsed or
    /// progress supplied).
    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_progress_driven(&self) -> bool {
        matches!(self.spec.driver, TweenDriver::Progress)
    }

    /// Feed an external progress value. Clamped to `[0, 1]`; the next
    /// `advance` stages writes only if the value actually changed.
    pub fn set_progress(&mut self, progress: f64) {
        let p = progress.clamp(0.0, 1.0);
        if !self.started || p != self.progress {
            self.progress = p;
            self.progress_dirty = true;
        }
    }

    /// Advance by `dt` seconds and stage any property writes.
    pub fn advance(&mut self, dt: f64, staged: &mut Vec<PropertyWrite>) {
        if self.done {
            return;
        }
        match self.spec.driver {
            TweenDriver::Time { duration } => {
                self.elapsed += dt.max(0.0);
                let local = self.elapsed - self.spec.delay;
                if local < 0.0 {
                    return;
                }
                self.started = true;
                let (pos, finished) = self.shaped_progress(local, duration);
                self.stage(self.spec.ease.apply(pos), staged);
                if finished {
                    self.done = true;
                }
            }
            TweenDriver::Progress => {
                if !self.progress_dirty {
                    return;
                }
                self.started = true;
                self.progress_dirty = false;
                self.stage(self.spec.ease.apply(self.progress), staged);
            }
        }
    }

    /// Map elapsed local time onto a cycle position in `[0, 1]`, honoring
    /// repeat and yoyo. Returns `(position, finished)`.
    fn shaped_progress(&self, local: f64, duration: f64) -> (f64, bool) {
        if duration <= 0.0 {
            // Degenerate duration resolves instantly at the end value.
            return (1.0, true);
        }
        let total = local / duration;
        match self.spec.repeat {
            0 => (total.min(1.0), total >= 1.0),
            r if r < 0 => {
                let cycle = total.floor();
                let mut pos = total - cycle;
                if self.spec.yoyo && (cycle as u64) % 2 == 1 {
                    pos = 1.0 - pos;
                }
                (pos, false)
            }
            r => {
                let cycles = f64::from(r + 1);
                if total >= cycles {
                    // Terminal position depends on the direction of the last
                    // cycle when yoyo is on.
                    let last_forward = !self.spec.yoyo || r % 2 == 0;
                    (if last_forward { 1.0 } else { 0.0 }, true)
                } else {
                    let cycle = total.floor();
                    let mut pos = total - cycle;
                    if self.spec.yoyo && (cycle as u64) % 2 == 1 {
                        pos = 1.0 - pos;
                    }
                    (pos, false)
                }
            }
        }
    }

    fn stage(&self, eased: f64, staged: &mut Vec<PropertyWrite>) {
        for track in &self.spec.tracks {
            let value = <f64 as Lerp>::lerp(&track.from, &track.to, eased);
            staged.push(PropertyWrite::set(self.spec.target, track.prop, value));
        }
    }
}
