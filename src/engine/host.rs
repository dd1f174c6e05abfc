//! Host boundary: elements, their committed properties, and input events.
//!
//! The engine does not own a DOM. The host registers each animated element
//! with document-space geometry and reads committed properties back after
//! every frame. All mutation funnels through [`PropertyWrite`] values applied
//! in the scheduler's commit phase; no component writes properties directly.

use crate::foundation::core::{ElementId, Point, Rect, Viewport};
use crate::foundation::error::{ChoreoError, ChoreoResult};

/// A scalar property the engine can animate on an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Prop {
    TranslateX,
    TranslateY,
    Scale,
    /// Rotation in degrees.
    Rotation,
    Opacity,
    /// Clip inset from the top edge as a fraction of element height in
    /// `[0, 1]`; `1.0` fully hides the element.
    ClipTop,
}

/// Committed animatable state of one element.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ElementProps {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotation: f64,
    pub opacity: f64,
    pub clip_top: f64,
    pub text: Option<String>,
}

impl Default for ElementProps {
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale: 1.0,
            rotation: 0.0,
            opacity: 1.0,
            clip_top: 0.0,
            text: None,
        }
    }
}

impl ElementProps {
    pub fn get(&self, prop: Prop) -> f64 {
        match prop {
            Prop::TranslateX => self.translate_x,
            Prop::TranslateY => self.translate_y,
            Prop::Scale => self.scale,
            Prop::Rotation => self.rotation,
            Prop::Opacity => self.opacity,
            Prop::ClipTop => self.clip_top,
        }
    }

    fn set(&mut self, prop: Prop, value: f64) {
        match prop {
            Prop::TranslateX => self.translate_x = value,
            Prop::TranslateY => self.translate_y = value,
            Prop::Scale => self.scale = value,
            Prop::Rotation => self.rotation = value,
            Prop::Opacity => self.opacity = value,
            Prop::ClipTop => self.clip_top = value,
        }
    }
}

/// One staged mutation, produced in the compute phases and applied during
/// commit.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyWrite {
    pub element: ElementId,
    pub op: WriteOp,
}

#[derive(Clone, Debug, PartialEq)]
pub enum WriteOp {
    Set(Prop, f64),
    SetText(String),
}

impl PropertyWrite {
    pub fn set(element: ElementId, prop: Prop, value: f64) -> Self {
        Self {
            element,
            op: WriteOp::Set(prop, value),
        }
    }

    pub fn text(element: ElementId, text: String) -> Self {
        Self {
            element,
            op: WriteOp::SetText(text),
        }
    }
}

/// Raw input the host forwards to the engine.
///
/// Wheel and touch deltas are in pixels; pointer positions are in viewport
/// coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    Wheel { delta_y: f64 },
    TouchMove { delta_y: f64 },
    PointerMove { x: f64, y: f64 },
    /// Pointer entered an interactive element (link, button).
    PointerOver(ElementId),
    /// Pointer left an interactive element.
    PointerOut(ElementId),
    PointerEnteredViewport,
    PointerLeftViewport,
    Resize { viewport: Viewport, content_height: f64 },
    VisibilityChanged { hidden: bool },
}

#[derive(Debug)]
struct ElementSlot {
    geometry: Rect,
    interactive: bool,
    props: ElementProps,
}

/// Store of every host-registered element: cached geometry plus the committed
/// property state the host mirrors to its real presentation layer.
#[derive(Debug, Default)]
pub struct ElementStore {
    slots: Vec<ElementSlot>,
}

impl ElementStore {
    pub fn insert(&mut self, geometry: Rect, interactive: bool) -> ElementId {
        let id = ElementId(self.slots.len() as u32);
        self.slots.push(ElementSlot {
            geometry,
            interactive,
            props: ElementProps::default(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: ElementId) -> bool {
        (id.0 as usize) < self.slots.len()
    }

    pub fn geometry(&self, id: ElementId) -> ChoreoResult<Rect> {
        self.slots
            .get(id.0 as usize)
            .map(|s| s.geometry)
            .ok_or_else(|| ChoreoError::evaluation(format!("unknown element {:?}", id)))
    }

    pub fn set_geometry(&mut self, id: ElementId, geometry: Rect) -> ChoreoResult<()> {
        let slot = self
            .slots
            .get_mut(id.0 as usize)
            .ok_or_else(|| ChoreoError::evaluation(format!("unknown element {:?}", id)))?;
        slot.geometry = geometry;
        Ok(())
    }

    /// Element center in document space, ignoring committed transforms.
    pub fn center(&self, id: ElementId) -> ChoreoResult<Point> {
        Ok(self.geometry(id)?.center())
    }

    pub fn is_interactive(&self, id: ElementId) -> bool {
        self.slots
            .get(id.0 as usize)
            .map(|s| s.interactive)
            .unwrap_or(false)
    }

    pub fn props(&self, id: ElementId) -> ChoreoResult<&ElementProps> {
        self.slots
            .get(id.0 as usize)
            .map(|s| &s.props)
            .ok_or_else(|| ChoreoError::evaluation(format!("unknown element {:?}", id)))
    }

    /// Apply one committed write. Writes against unknown elements are dropped
    /// with a warning; a broken animation must never break the host page.
    pub(crate) fn apply(&mut self, write: &PropertyWrite) {
        let Some(slot) = self.slots.get_mut(write.element.0 as usize) else {
            tracing::warn!(element = ?write.element, "dropping write for unknown element");
            return;
        };
        match &write.op {
            WriteOp::Set(prop, value) => slot.props.set(*prop, *value),
            WriteOp::SetText(text) => slot.props.text = Some(text.clone()),
        }
    }

    /// Committed properties of every element, in registration order. Used for
    /// deterministic snapshots.
    pub fn snapshot(&self) -> Vec<ElementProps> {
        self.slots.iter().map(|s| s.props.clone()).collect()
    }
}
