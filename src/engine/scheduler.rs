//! Frame scheduler and engine context.
//!
//! The engine owns every registered behavior and the strict per-frame
//! ordering: (1) smooth-scroll update, (2) trigger evaluation, (3)
//! tween/counter/effect advancement, (4) commit of staged property writes.
//! Phases 1-3 only compute; nothing touches host-visible state before the
//! commit phase, so no component can read a value that has not been updated
//! this frame.

use crate::animation::tween::{Tween, TweenDriver, TweenSpec, staggered};
use crate::counter::Counter;
use crate::effects::{Effect, EffectConfig, EffectCtx};
use crate::engine::host::{ElementStore, InputEvent, PropertyWrite};
use crate::foundation::core::{ElementId, Point, Rect, Viewport};
use crate::foundation::error::ChoreoResult;
use crate::scroll::smoother::{ScrollSmoother, SmootherConfig};
use crate::scroll::state::ScrollState;
use crate::trigger::registry::{Edge, FiringKind, Trigger, TriggerAction, TriggerRegistry};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    pub viewport: Viewport,
    /// Total scrollable document height in px.
    pub content_height: f64,
    #[serde(default)]
    pub smoother: SmootherConfig,
}

impl EngineConfig {
    pub fn new(viewport: Viewport, content_height: f64) -> Self {
        Self {
            viewport,
            content_height,
            smoother: SmootherConfig::default(),
        }
    }

    fn max_offset(&self) -> f64 {
        (self.content_height - self.viewport.height).max(0.0)
    }
}

/// Per-frame report: how much work the commit phase did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStats {
    pub frame: u64,
    pub writes: usize,
    /// True when the frame was dropped whole (zero dt or hidden tab).
    pub skipped: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TweenHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CounterHandle(usize);

/// The engine context: explicit constructor/teardown lifecycle, no ambient
/// global state. All registration goes through it and every handle it
/// returns disposes idempotently.
pub struct Engine {
    config: EngineConfig,
    store: ElementStore,
    smoother: ScrollSmoother,
    triggers: TriggerRegistry,
    tweens: Vec<Option<Tween>>,
    effects: Vec<Option<Effect>>,
    counters: Vec<Option<(Counter, usize)>>,
    pointer: Point,
    pointer_in_viewport: bool,
    hidden: bool,
    staged: Vec<PropertyWrite>,
    firings: Vec<crate::trigger::registry::Firing>,
    frame_count: u64,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let smoother = ScrollSmoother::new(config.smoother, config.max_offset());
        let triggers = TriggerRegistry::new(config.viewport.height);
        Self {
            config,
            store: ElementStore::default(),
            smoother,
            triggers,
            tweens: Vec::new(),
            effects: Vec::new(),
            counters: Vec::new(),
            pointer: Point::ZERO,
            pointer_in_viewport: false,
            hidden: false,
            staged: Vec::new(),
            firings: Vec::new(),
            frame_count: 0,
        }
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn scroll_state(&self) -> &ScrollState {
        self.smoother.state()
    }

    pub fn viewport(&self) -> Viewport {
        self.config.viewport
    }

    pub fn add_element(&mut self, geometry: Rect, interactive: bool) -> ElementId {
        self.store.insert(geometry, interactive)
    }

    /// Host-reported layout change for one element; marks cached trigger
    /// geometry dirty.
    pub fn set_element_geometry(&mut self, id: ElementId, geometry: Rect) -> ChoreoResult<()> {
        self.store.set_geometry(id, geometry)?;
        self.triggers.invalidate_layout();
        for effect in self.effects.iter_mut().flatten() {
            effect.on_layout_invalidated(&self.store);
        }
        Ok(())
    }

    /// Jump the scroll target (anchor navigation).
    pub fn scroll_to(&mut self, offset: f64, immediate: bool) {
        self.smoother.scroll_to(offset, immediate);
    }

    // ---- registration -----------------------------------------------------

    /// Fire `tweens` once, the first time `start` is crossed.
    pub fn register_one_shot_trigger(
        &mut self,
        element: ElementId,
        start: Edge,
        tweens: Vec<TweenSpec>,
    ) -> TriggerHandle {
        let tweens = tweens.into_iter().map(sanitize_spec).collect();
        let index = self
            .triggers
            .register_one_shot(element, start, TriggerAction::StartTweens(tweens));
        TriggerHandle(index)
    }

    /// Bind a progress-driven tween to the scroll span between `start` and
    /// `end` on `element`. The tween is re-fed whenever the progress value
    /// changes, in either direction.
    pub fn register_scrub_trigger(
        &mut self,
        element: ElementId,
        start: Edge,
        end: Edge,
        tween: TweenSpec,
    ) -> TriggerHandle {
        let mut spec = sanitize_spec(tween);
        if !matches!(spec.driver, TweenDriver::Progress) {
            tracing::warn!(?element, "scrub trigger given a time-driven tween; coercing");
            spec.driver = TweenDriver::Progress;
        }
        let tween_index = self.insert_tween(Tween::new(spec));
        let index =
            self.triggers
                .register_scrub(element, start, end, TriggerAction::DriveTween(tween_index));
        TriggerHandle(index)
    }

    /// Start a free-running tween immediately.
    pub fn start_tween(&mut self, spec: TweenSpec) -> TweenHandle {
        TweenHandle(self.insert_tween(Tween::new(sanitize_spec(spec))))
    }

    /// Start a list of tweens with per-index delays `base + i * step`.
    pub fn start_staggered(
        &mut self,
        specs: Vec<TweenSpec>,
        base: f64,
        step: f64,
    ) -> Vec<TweenHandle> {
        staggered(specs, base, step)
            .into_iter()
            .map(|spec| self.start_tween(spec))
            .collect()
    }

    pub fn register_effect(&mut self, config: EffectConfig) -> ChoreoResult<EffectHandle> {
        let effect = config.build(&self.store)?;
        self.effects.push(Some(effect));
        Ok(EffectHandle(self.effects.len() - 1))
    }

    /// Count from 0 to `target` over `duration` seconds once `element`
    /// crosses the default reveal line (top of the element at 80% of the
    /// viewport).
    pub fn attach_counter(
        &mut self,
        element: ElementId,
        target: f64,
        duration: f64,
    ) -> CounterHandle {
        self.attach_counter_at(element, target, duration, Edge::new(0.0, 0.8))
    }

    pub fn attach_counter_at(
        &mut self,
        element: ElementId,
        target: f64,
        duration: f64,
        start: Edge,
    ) -> CounterHandle {
        let counter_index = self.counters.len();
        let trigger_index =
            self.triggers
                .register_one_shot(element, start, TriggerAction::FireCounter(counter_index));
        self.counters
            .push(Some((Counter::new(element, target, duration), trigger_index)));
        CounterHandle(counter_index)
    }

    // ---- disposal (all idempotent) ----------------------------------------

    pub fn dispose_trigger(&mut self, handle: TriggerHandle) {
        if let Some(trigger) = self.triggers.dispose(handle.0) {
            self.cancel_bound_tween(&trigger);
        }
    }

    pub fn cancel_tween(&mut self, handle: TweenHandle) {
        if let Some(slot) = self.tweens.get_mut(handle.0) {
            *slot = None;
        }
    }

    pub fn dispose_effect(&mut self, handle: EffectHandle) {
        if let Some(slot) = self.effects.get_mut(handle.0) {
            *slot = None;
        }
    }

    pub fn dispose_counter(&mut self, handle: CounterHandle) {
        if let Some(slot) = self.counters.get_mut(handle.0) {
            if let Some((_, trigger_index)) = slot.take() {
                self.triggers.dispose(trigger_index);
            }
        }
    }

    /// Synchronously drop every outstanding behavior. A leaked per-frame
    /// callback after teardown is a defect, so this is total.
    pub fn teardown(&mut self) {
        tracing::debug!(frame = self.frame_count, "engine teardown");
        self.triggers.clear();
        self.tweens.clear();
        self.effects.clear();
        self.counters.clear();
        self.staged.clear();
        self.firings.clear();
    }

    /// Number of behaviors still scheduled for the next frame.
    pub fn active_behaviors(&self) -> usize {
        self.triggers.active_count()
            + self.tweens.iter().flatten().count()
            + self.effects.iter().flatten().count()
            + self.counters.iter().flatten().count()
    }

    // ---- input ------------------------------------------------------------

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Wheel { delta_y } => self.smoother.add_wheel(delta_y),
            InputEvent::TouchMove { delta_y } => self.smoother.add_touch(delta_y),
            InputEvent::PointerMove { x, y } => {
                self.pointer = Point::new(x, y);
                self.pointer_in_viewport = true;
            }
            InputEvent::PointerOver(element) => {
                let interactive = self.store.is_interactive(element);
                for effect in self.effects.iter_mut().flatten() {
                    effect.on_pointer_over(element, interactive);
                }
            }
            InputEvent::PointerOut(element) => {
                let interactive = self.store.is_interactive(element);
                for effect in self.effects.iter_mut().flatten() {
                    effect.on_pointer_out(element, interactive);
                }
            }
            InputEvent::PointerEnteredViewport => {
                self.pointer_in_viewport = true;
                for effect in self.effects.iter_mut().flatten() {
                    effect.on_viewport_presence(true);
                }
            }
            InputEvent::PointerLeftViewport => {
                self.pointer_in_viewport = false;
                for effect in self.effects.iter_mut().flatten() {
                    effect.on_viewport_presence(false);
                }
            }
            InputEvent::Resize {
                viewport,
                content_height,
            } => {
                self.config.viewport = viewport;
                self.config.content_height = content_height;
                self.smoother.set_max_offset(self.config.max_offset());
                self.triggers.set_viewport_height(viewport.height);
                self.triggers.invalidate_layout();
                for effect in self.effects.iter_mut().flatten() {
                    effect.on_layout_invalidated(&self.store);
                }
            }
            InputEvent::VisibilityChanged { hidden } => self.hidden = hidden,
        }
    }

    // ---- the frame --------------------------------------------------------

    /// Advance one frame by `dt` seconds.
    #[tracing::instrument(level = "trace", skip(self))]
    pub fn frame(&mut self, dt: f64) -> ChoreoResult<FrameStats> {
        self.frame_count += 1;
        if dt <= 0.0 || self.hidden {
            // Transient environment condition: retry next frame.
            return Ok(FrameStats {
                frame: self.frame_count,
                writes: 0,
                skipped: true,
            });
        }

        // Phase 1: the single scroll-state writer runs first.
        self.smoother.update(dt);
        let offset = self.smoother.virtual_offset();

        // Phase 2: evaluate triggers against the fresh offset.
        self.firings.clear();
        self.triggers.evaluate(offset, &self.store, &mut self.firings);
        let firings = std::mem::take(&mut self.firings);
        for firing in &firings {
            let Some(action) = self.triggers.action(firing.trigger).cloned() else {
                continue;
            };
            match (firing.kind, action) {
                (FiringKind::Enter, TriggerAction::StartTweens(specs)) => {
                    let started: Vec<usize> = specs
                        .into_iter()
                        .map(|spec| self.insert_tween(Tween::new(spec)))
                        .collect();
                    // The trigger keeps the indices so its disposer can
                    // cancel entrances still in flight.
                    self.triggers.record_spawned(firing.trigger, &started);
                }
                (FiringKind::Enter, TriggerAction::FireCounter(index)) => {
                    if let Some(Some((counter, _))) = self.counters.get_mut(index) {
                        counter.fire();
                    }
                }
                (FiringKind::Progress(p), TriggerAction::DriveTween(index)) => {
                    if let Some(Some(tween)) = self.tweens.get_mut(index) {
                        tween.set_progress(p);
                    }
                }
                (kind, action) => {
                    debug_assert!(false, "mismatched firing {kind:?} for {action:?}");
                }
            }
        }
        self.firings = firings;

        // Phase 3: advance every active timeline; writes are only staged.
        for slot in &mut self.tweens {
            if let Some(tween) = slot {
                tween.advance(dt, &mut self.staged);
                if tween.is_done() {
                    *slot = None;
                }
            }
        }
        for slot in &mut self.counters {
            if let Some((counter, trigger_index)) = slot {
                counter.advance(dt, &mut self.staged);
                if counter.is_done() {
                    // The trigger is already spent; release both.
                    self.triggers.dispose(*trigger_index);
                    *slot = None;
                }
            }
        }
        let ctx = EffectCtx {
            pointer: self.pointer,
            pointer_in_viewport: self.pointer_in_viewport,
            scroll_offset: offset,
            store: &self.store,
        };
        for effect in self.effects.iter_mut().flatten() {
            effect.update(dt, ctx, &mut self.staged);
        }

        // Phase 4: commit.
        let writes = self.staged.len();
        for write in &self.staged {
            self.store.apply(write);
        }
        self.staged.clear();

        Ok(FrameStats {
            frame: self.frame_count,
            writes,
            skipped: false,
        })
    }

    fn insert_tween(&mut self, tween: Tween) -> usize {
        self.tweens.push(Some(tween));
        self.tweens.len() - 1
    }

    fn cancel_bound_tween(&mut self, trigger: &Trigger) {
        if let TriggerAction::DriveTween(index) = trigger.action {
            if let Some(slot) = self.tweens.get_mut(index) {
                *slot = None;
            }
        }
        for &index in &trigger.spawned {
            if let Some(slot) = self.tweens.get_mut(index) {
                *slot = None;
            }
        }
    }
}

/// Clamp malformed tween parameters to safe degenerate behavior instead of
/// failing: a broken animation must never break page interactivity.
fn sanitize_spec(mut spec: TweenSpec) -> TweenSpec {
    if let Err(err) = spec.validate() {
        tracing::warn!(%err, target = ?spec.target, "tween spec degraded");
        if let TweenDriver::Time { duration } = &mut spec.driver {
            if !duration.is_finite() || *duration < 0.0 {
                *duration = 0.0;
            }
        }
        if !spec.delay.is_finite() || spec.delay < 0.0 {
            spec.delay = 0.0;
        }
        if spec.repeat < -1 {
            spec.repeat = -1;
        }
    }
    spec
}
