//! Trigger registry: viewport-relative regions evaluated against the virtual
//! scroll offset every frame.
//!
//! A one-shot trigger fires its action the first time its start edge is
//! crossed and never reconsiders the element. A scrub trigger's progress is a
//! pure clamped function of the offset and the cached element bounds,
//! recomputed each frame and reversible with scroll direction.

use crate::animation::tween::TweenSpec;
use crate::engine::host::ElementStore;
use crate::foundation::core::ElementId;

/// A viewport-relative edge: the scroll offset at which a fraction of the
/// element's height meets a fraction of the viewport's height.
///
/// `Edge::new(0.0, 1.0)` is "element top meets viewport bottom" — the moment
/// the element becomes visible at all; `Edge::new(0.0, 0.8)` is the classic
/// "top 80%" reveal line.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    /// 0.0 = element top, 1.0 = element bottom.
    pub element_anchor: f64,
    /// 0.0 = viewport top, 1.0 = viewport bottom.
    pub viewport_anchor: f64,
}

impl Edge {
    /// Element top meets viewport bottom (element enters from below).
    pub const TOP_BOTTOM: Edge = Edge::new(0.0, 1.0);
    /// Element top meets viewport top (element pinned at the top).
    pub const TOP_TOP: Edge = Edge::new(0.0, 0.0);
    /// Element bottom meets viewport top (element fully scrolled past).
    pub const BOTTOM_TOP: Edge = Edge::new(1.0, 0.0);

    pub const fn new(element_anchor: f64, viewport_anchor: f64) -> Self {
        Self {
            element_anchor,
            viewport_anchor,
        }
    }

    /// Scroll offset at which this edge is crossed, given document-space
    /// element bounds and the viewport height.
    pub fn resolve(&self, bounds: kurbo::Rect, viewport_height: f64) -> f64 {
        bounds.y0 + self.element_anchor * bounds.height() - self.viewport_anchor * viewport_height
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerMode {
    OneShot,
    Scrub,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerState {
    Pending,
    Active,
    Done,
}

/// What a trigger does when it fires. Stored as data so the scheduler can
/// iterate one homogeneous list instead of juggling per-element closures.
#[derive(Clone, Debug)]
pub(crate) enum TriggerAction {
    /// One-shot: start these tweens.
    StartTweens(Vec<TweenSpec>),
    /// One-shot: arm the counter at this arena index.
    FireCounter(usize),
    /// Scrub: feed progress into the tween at this arena index.
    DriveTween(usize),
}

#[derive(Clone, Debug)]
pub(crate) struct Trigger {
    pub(crate) element: ElementId,
    pub(crate) start: Edge,
    pub(crate) end: Option<Edge>,
    pub(crate) mode: TriggerMode,
    pub(crate) state: TriggerState,
    pub(crate) action: TriggerAction,
    /// Arena indices of tweens this trigger started, so disposal can cancel
    /// them while they are still in flight.
    pub(crate) spawned: Vec<usize>,
    /// Resolved `(start, end)` offsets, cached until layout invalidation.
    span: Option<(f64, f64)>,
    degenerate_warned: bool,
    last_progress: Option<f64>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum FiringKind {
    Enter,
    Progress(f64),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Firing {
    pub(crate) trigger: usize,
    pub(crate) kind: FiringKind,
}

/// Owns trigger lifecycle. Indices are never reused, so a stale handle
/// disposes nothing instead of killing a later registration.
pub(crate) struct TriggerRegistry {
    triggers: Vec<Option<Trigger>>,
    viewport_height: f64,
    layout_dirty: bool,
}

impl TriggerRegistry {
    pub(crate) fn new(viewport_height: f64) -> Self {
        Self {
            triggers: Vec::new(),
            viewport_height,
            layout_dirty: false,
        }
    }

    pub(crate) fn register_one_shot(
        &mut self,
        element: ElementId,
        start: Edge,
        action: TriggerAction,
    ) -> usize {
        self.push(Trigger {
            element,
            start,
            end: None,
            mode: TriggerMode::OneShot,
            state: TriggerState::Pending,
            action,
            spawned: Vec::new(),
            span: None,
            degenerate_warned: false,
            last_progress: None,
        })
    }

    pub(crate) fn register_scrub(
        &mut self,
        element: ElementId,
        start: Edge,
        end: Edge,
        action: TriggerAction,
    ) -> usize {
        self.push(Trigger {
            element,
            start,
            end: Some(end),
            mode: TriggerMode::Scrub,
            state: TriggerState::Pending,
            action,
            spawned: Vec::new(),
            span: None,
            degenerate_warned: false,
            last_progress: None,
        })
    }

    fn push(&mut self, trigger: Trigger) -> usize {
        self.triggers.push(Some(trigger));
        self.triggers.len() - 1
    }

    /// Remove a trigger. Idempotent; returns the trigger so the caller can
    /// cancel anything bound to it.
    pub(crate) fn dispose(&mut self, index: usize) -> Option<Trigger> {
        self.triggers.get_mut(index).and_then(Option::take)
    }

    pub(crate) fn action(&self, index: usize) -> Option<&TriggerAction> {
        self.triggers.get(index).and_then(|t| t.as_ref()).map(|t| &t.action)
    }

    /// Remember the tween arena slots a fired trigger just started.
    pub(crate) fn record_spawned(&mut self, index: usize, tweens: &[usize]) {
        if let Some(Some(trigger)) = self.triggers.get_mut(index) {
            trigger.spawned.extend_from_slice(tweens);
        }
    }

    pub(crate) fn state(&self, index: usize) -> Option<TriggerState> {
        self.triggers
            .get(index)
            .and_then(|t| t.as_ref())
            .map(|t| t.state)
    }

    pub(crate) fn active_count(&self) -> usize {
        self.triggers.iter().flatten().count()
    }

    /// Drop every trigger at once (engine teardown).
    pub(crate) fn clear(&mut self) {
        self.triggers.clear();
    }

    /// Geometry must be re-read on the next evaluation (resize, layout
    /// change). Never done unconditionally per frame.
    pub(crate) fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
    }

    pub(crate) fn set_viewport_height(&mut self, viewport_height: f64) {
        if viewport_height != self.viewport_height {
            self.viewport_height = viewport_height;
            self.layout_dirty = true;
        }
    }

    /// Evaluate every trigger against the current virtual offset, in
    /// registration order. Firings are appended to `out`; the caller performs
    /// the actions after this borrow ends.
    pub(crate) fn evaluate(&mut self, offset: f64, store: &ElementStore, out: &mut Vec<Firing>) {
        let viewport_height = self.viewport_height;
        let layout_dirty = self.layout_dirty;

        for (index, slot) in self.triggers.iter_mut().enumerate() {
            let Some(trigger) = slot.as_mut() else {
                continue;
            };
            if trigger.mode == TriggerMode::OneShot && trigger.state == TriggerState::Done {
                continue;
            }

            if trigger.span.is_none() || layout_dirty {
                let Ok(bounds) = store.geometry(trigger.element) else {
                    // Geometry not available yet; retry next frame.
                    tracing::trace!(?trigger.element, "trigger geometry missing, skipping");
                    continue;
                };
                let start = trigger.start.resolve(bounds, viewport_height);
                let end = trigger
                    .end
                    .map(|e| e.resolve(bounds, viewport_height))
                    .unwrap_or(start);
                trigger.span = Some((start, end));
            }
            let (start, end) = trigger.span.expect("span resolved above");

            match trigger.mode {
                TriggerMode::OneShot => {
                    if offset >= start {
                        // pending -> active -> done in one step: "once"
                        // semantics never reconsider this element.
                        trigger.state = TriggerState::Done;
                        out.push(Firing {
                            trigger: index,
                            kind: FiringKind::Enter,
                        });
                    }
                }
                TriggerMode::Scrub => {
                    trigger.state = TriggerState::Active;
                    let progress = if end <= start {
                        if !trigger.degenerate_warned {
                            tracing::warn!(
                                ?trigger.element,
                                start,
                                end,
                                "scrub trigger has end <= start; treating as satisfied"
                            );
                            trigger.degenerate_warned = true;
                        }
                        1.0
                    } else {
                        ((offset - start) / (end - start)).clamp(0.0, 1.0)
                    };
                    if trigger.last_progress != Some(progress) {
                        trigger.last_progress = Some(progress);
                        out.push(Firing {
                            trigger: index,
                            kind: FiringKind::Progress(progress),
                        });
                    }
                }
            }
        }

        self.layout_dirty = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Rect;

    fn store_with(rects: &[Rect]) -> (ElementStore, Vec<ElementId>) {
        let mut store = ElementStore::default();
        let ids = rects.iter().map(|r| store.insert(*r, false)).collect();
        (store, ids)
    }

    fn noop_action() -> TriggerAction {
        TriggerAction::StartTweens(Vec::new())
    }

    #[test]
    fn edge_resolution_matches_the_viewport_math() {
        let bounds = Rect::new(0.0, 1000.0, 500.0, 1400.0);
        // Element top meets viewport bottom (800px tall viewport).
        assert_eq!(Edge::TOP_BOTTOM.resolve(bounds, 800.0), 200.0);
        // Element bottom meets viewport top.
        assert_eq!(Edge::BOTTOM_TOP.resolve(bounds, 800.0), 1400.0);
        // "top 80%" line.
        assert_eq!(Edge::new(0.0, 0.8).resolve(bounds, 800.0), 360.0);
    }

    #[test]
    fn one_shot_fires_exactly_once_across_recrossings() {
        let (store, ids) = store_with(&[Rect::new(0.0, 1000.0, 100.0, 1200.0)]);
        let mut reg = TriggerRegistry::new(800.0);
        reg.register_one_shot(ids[0], Edge::TOP_BOTTOM, noop_action());

        let mut out = Vec::new();
        // forward past the edge, back before it, forward again
        for offset in [0.0, 300.0, 0.0, 500.0, 250.0, 900.0] {
            reg.evaluate(offset, &store, &mut out);
        }
        let enters = out
            .iter()
            .filter(|f| f.kind == FiringKind::Enter)
            .count();
        assert_eq!(enters, 1);
        assert_eq!(reg.state(0), Some(TriggerState::Done));
    }

    #[test]
    fn scrub_progress_is_exact_at_both_edges() {
        let (store, ids) = store_with(&[Rect::new(0.0, 1000.0, 100.0, 1400.0)]);
        let mut reg = TriggerRegistry::new(800.0);
        reg.register_scrub(ids[0], Edge::TOP_BOTTOM, Edge::BOTTOM_TOP, noop_action());

        let start = 200.0;
        let end = 1400.0;
        let mut out = Vec::new();

        reg.evaluate(start, &store, &mut out);
        assert_eq!(out.pop().unwrap().kind, FiringKind::Progress(0.0));

        out.clear();
        reg.evaluate((start + end) / 2.0, &store, &mut out);
        assert_eq!(out.pop().unwrap().kind, FiringKind::Progress(0.5));

        out.clear();
        reg.evaluate(end, &store, &mut out);
        assert_eq!(out.pop().unwrap().kind, FiringKind::Progress(1.0));

        // Reversible: scrolling back moves progress backward.
        out.clear();
        reg.evaluate(start, &store, &mut out);
        assert_eq!(out.pop().unwrap().kind, FiringKind::Progress(0.0));
    }

    #[test]
    fn scrub_dedupes_unchanged_progress() {
        let (store, ids) = store_with(&[Rect::new(0.0, 1000.0, 100.0, 1400.0)]);
        let mut reg = TriggerRegistry::new(800.0);
        reg.register_scrub(ids[0], Edge::TOP_BOTTOM, Edge::BOTTOM_TOP, noop_action());

        let mut out = Vec::new();
        reg.evaluate(0.0, &store, &mut out); // clamped to 0
        reg.evaluate(0.0, &store, &mut out);
        reg.evaluate(100.0, &store, &mut out); // still before start, clamped 0
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn degenerate_bounds_are_treated_as_satisfied() {
        let (store, ids) = store_with(&[Rect::new(0.0, 1000.0, 100.0, 1400.0)]);
        let mut reg = TriggerRegistry::new(800.0);
        // end edge resolves before the start edge
        reg.register_scrub(ids[0], Edge::BOTTOM_TOP, Edge::TOP_BOTTOM, noop_action());

        let mut out = Vec::new();
        reg.evaluate(0.0, &store, &mut out);
        assert_eq!(out.pop().unwrap().kind, FiringKind::Progress(1.0));
    }

    #[test]
    fn shared_elements_fire_in_registration_order() {
        let (store, ids) = store_with(&[Rect::new(0.0, 100.0, 100.0, 300.0)]);
        let mut reg = TriggerRegistry::new(800.0);
        let a = reg.register_one_shot(ids[0], Edge::TOP_BOTTOM, noop_action());
        let b = reg.register_one_shot(ids[0], Edge::TOP_BOTTOM, noop_action());

        let mut out = Vec::new();
        reg.evaluate(500.0, &store, &mut out);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].trigger, a);
        assert_eq!(out[1].trigger, b);
    }

    #[test]
    fn dispose_is_idempotent_and_stops_evaluation() {
        let (store, ids) = store_with(&[Rect::new(0.0, 100.0, 100.0, 300.0)]);
        let mut reg = TriggerRegistry::new(800.0);
        let idx = reg.register_one_shot(ids[0], Edge::TOP_BOTTOM, noop_action());

        assert!(reg.dispose(idx).is_some());
        assert!(reg.dispose(idx).is_none());
        assert_eq!(reg.active_count(), 0);

        let mut out = Vec::new();
        reg.evaluate(1e6, &store, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn layout_invalidation_recomputes_cached_spans() {
        let (mut store, ids) = store_with(&[Rect::new(0.0, 10_000.0, 100.0, 10_200.0)]);
        let mut reg = TriggerRegistry::new(800.0);
        reg.register_one_shot(ids[0], Edge::TOP_BOTTOM, noop_action());

        let mut out = Vec::new();
        reg.evaluate(500.0, &store, &mut out);
        assert!(out.is_empty(), "far below the fold");

        // Element moves up (layout change), registry told to re-read.
        store
            .set_geometry(ids[0], Rect::new(0.0, 1000.0, 100.0, 1200.0))
            .unwrap();
        reg.evaluate(500.0, &store, &mut out);
        assert!(out.is_empty(), "stale span without invalidation");

        reg.invalidate_layout();
        reg.evaluate(500.0, &store, &mut out);
        assert_eq!(out.len(), 1);
    }
}
