//! Numeric counter driver: interpolates a hidden accumulator from zero to a
//! target and renders its rounded value as text, firing once per element.
//!
//! Progress derives from elapsed wall-clock time, so the displayed value
//! always lands on exactly the target at or before the configured duration,
//! regardless of frame-rate variance.

use crate::animation::ease::Ease;
use crate::engine::host::PropertyWrite;
use crate::foundation::core::ElementId;
use crate::foundation::math::lerp;

/// The count-up curve. Quadratic ease-out is monotone, which keeps the
/// rendered value non-decreasing.
const COUNT_EASE: Ease = Ease::OutQuad;

#[derive(Clone, Debug)]
pub(crate) struct Counter {
    element: ElementId,
    target: f64,
    /// Count-up duration in seconds.
    duration: f64,
    fired: bool,
    elapsed: f64,
    last_rendered: Option<i64>,
    done: bool,
}

impl Counter {
    pub(crate) fn new(element: ElementId, target: f64, duration: f64) -> Self {
        Self {
            element,
            target,
            duration: duration.max(0.0),
            fired: false,
            elapsed: 0.0,
            last_rendered: None,
            done: false,
        }
    }

    /// Arm the count-up. Flips `fired` exactly once; later calls are no-ops.
    pub(crate) fn fire(&mut self) {
        if !self.fired {
            self.fired = true;
            self.elapsed = 0.0;
        }
    }

    pub(crate) fn has_fired(&self) -> bool {
        self.fired
    }

    pub(crate) fn is_done(&self) -> bool {
        self.done
    }

    pub(crate) fn advance(&mut self, dt: f64, staged: &mut Vec<PropertyWrite>) {
        if !self.fired || self.done {
            return;
        }
        self.elapsed += dt.max(0.0);
        let t = if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        };
        let value = lerp(0.0, self.target, COUNT_EASE.apply(t));
        let rendered = value.round() as i64;
        if self.last_rendered != Some(rendered) {
            self.last_rendered = Some(rendered);
            staged.push(PropertyWrite::text(self.element, rendered.to_string()));
        }
        if t >= 1.0 {
            self.done = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::host::WriteOp;

    fn texts(staged: &[PropertyWrite]) -> Vec<String> {
        staged
            .iter()
            .map(|w| match &w.op {
                WriteOp::SetText(t) => t.clone(),
                WriteOp::Set(..) => panic!("unexpected property write"),
            })
            .collect()
    }

    #[test]
    fn does_nothing_until_fired() {
        let mut c = Counter::new(ElementId(0), 500.0, 2.0);
        let mut staged = Vec::new();
        c.advance(1.0, &mut staged);
        assert!(staged.is_empty());
        assert!(!c.has_fired());
    }

    #[test]
    fn fire_is_idempotent() {
        let mut c = Counter::new(ElementId(0), 500.0, 2.0);
        c.fire();
        let mut staged = Vec::new();
        c.advance(1.0, &mut staged);
        c.fire(); // must not restart the accumulator
        c.advance(1.0, &mut staged);
        assert_eq!(texts(&staged).last().unwrap(), "500");
    }

    #[test]
    fn terminates_at_exactly_the_target() {
        let mut c = Counter::new(ElementId(0), 500.0, 2.0);
        c.fire();
        let mut staged = Vec::new();
        let mut elapsed = 0.0;
        while elapsed < 2.5 {
            c.advance(1.0 / 30.0, &mut staged);
            elapsed += 1.0 / 30.0;
        }
        assert_eq!(texts(&staged).last().unwrap(), "500");
        assert!(c.is_done());
    }

    #[test]
    fn rendered_value_is_monotone() {
        let mut c = Counter::new(ElementId(0), 500.0, 2.0);
        c.fire();
        let mut staged = Vec::new();
        for _ in 0..300 {
            c.advance(1.0 / 144.0, &mut staged);
        }
        let values: Vec<i64> = texts(&staged).iter().map(|t| t.parse().unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*values.last().unwrap(), 500);
    }

    #[test]
    fn zero_duration_renders_the_target_immediately() {
        let mut c = Counter::new(ElementId(0), 42.0, 0.0);
        c.fire();
        let mut staged = Vec::new();
        c.advance(0.016, &mut staged);
        assert_eq!(texts(&staged), vec!["42".to_string()]);
        assert!(c.is_done());
    }

    #[test]
    fn no_writes_after_completion() {
        let mut c = Counter::new(ElementId(0), 10.0, 0.5);
        c.fire();
        let mut staged = Vec::new();
        c.advance(1.0, &mut staged);
        let n = staged.len();
        c.advance(1.0, &mut staged);
        assert_eq!(staged.len(), n);
    }
}
