//! Marquee: a duplicated content strip translated at constant velocity,
//! wrapping seamlessly by exactly one content-width.

use crate::engine::host::{ElementStore, Prop, PropertyWrite};
use crate::foundation::core::ElementId;
use crate::foundation::error::ChoreoResult;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MarqueeConfig {
    /// The strip element; its geometry width covers all duplicated copies.
    pub element: ElementId,
    /// Travel speed in px/s. Positive scrolls the content leftward.
    pub velocity: f64,
    /// How many copies of the content the strip holds. Must be at least 2 so
    /// the wrap point is never visible; lower values are clamped.
    pub duplication: u32,
}

impl MarqueeConfig {
    pub fn new(element: ElementId, velocity: f64) -> Self {
        Self {
            element,
            velocity,
            duplication: 2,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Marquee {
    config: MarqueeConfig,
    content_width: f64,
    translation: f64,
}

impl Marquee {
    pub(crate) fn new(mut config: MarqueeConfig, store: &ElementStore) -> ChoreoResult<Self> {
        if config.duplication < 2 {
            tracing::warn!(
                ?config.element,
                duplication = config.duplication,
                "marquee duplication below 2 would expose the wrap seam; clamping"
            );
            config.duplication = 2;
        }
        let content_width = Self::measure(&config, store)?;
        Ok(Self {
            config,
            content_width,
            translation: 0.0,
        })
    }

    fn measure(config: &MarqueeConfig, store: &ElementStore) -> ChoreoResult<f64> {
        let width = store.geometry(config.element)?.width();
        Ok(width / f64::from(config.duplication))
    }

    pub(crate) fn on_layout_invalidated(&mut self, store: &ElementStore) {
        if let Ok(w) = Self::measure(&self.config, store) {
            self.content_width = w;
        }
    }

    /// Current rendered offset: always `translation mod content_width`.
    pub(crate) fn offset(&self) -> f64 {
        if self.content_width <= 0.0 {
            return 0.0;
        }
        self.translation.rem_euclid(self.content_width)
    }

    pub(crate) fn update(&mut self, dt: f64, staged: &mut Vec<PropertyWrite>) {
        if self.content_width <= 0.0 {
            // Geometry not measured yet; retry after the next layout pass.
            return;
        }
        self.translation += self.config.velocity * dt.max(0.0);
        staged.push(PropertyWrite::set(
            self.config.element,
            Prop::TranslateX,
            -self.offset(),
        ));
    }
}
