//! Serde model of a page choreography.
//!
//! A [`SceneDef`] is the JSON boundary of the crate: the host (or the CLI)
//! describes a page's elements and their motion behaviors as data, and
//! [`build_scene`](crate::scene::build::build_scene) turns it into a running
//! engine. Validation happens up front; per-frame code never re-checks the
//! model.

use serde::{Deserialize, Serialize};

use crate::animation::ease::Ease;
use crate::engine::host::Prop;
use crate::foundation::core::{Rect, Viewport};
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::scroll::smoother::SmootherConfig;
use crate::trigger::registry::Edge;

/// A complete page choreography.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub viewport: Viewport,
    pub content_height: f64,
    #[serde(default)]
    pub smoother: SmootherConfig,
    pub elements: Vec<ElementDef>,
    /// Reveal sequences that cascade over several elements with one trigger.
    #[serde(default)]
    pub staggers: Vec<StaggerDef>,
    #[serde(default)]
    pub cursor: Option<CursorDef>,
}

/// One animated element with document-space geometry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementDef {
    pub name: String,
    pub bounds: Rect,
    #[serde(default)]
    pub interactive: bool,
    #[serde(default)]
    pub behaviors: Vec<BehaviorDef>,
}

/// The two-part pointer decoration, referencing elements by name.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CursorDef {
    pub dot: String,
    pub ring: String,
}

/// Fade-and-rise entrance shared by single reveals and stagger groups.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealDef {
    /// Seconds.
    pub duration: f64,
    /// Starting downward offset in px, animated to rest.
    pub offset_y: f64,
    pub ease: Ease,
}

impl Default for RevealDef {
    fn default() -> Self {
        Self {
            duration: 0.8,
            offset_y: 40.0,
            ease: Ease::OutCubic,
        }
    }
}

/// A reveal cascade: when the first member crosses `at`, every member's
/// entrance starts with delay `base + index * step`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StaggerDef {
    pub elements: Vec<String>,
    #[serde(default)]
    pub base: f64,
    pub step: f64,
    #[serde(default = "reveal_edge")]
    pub at: Edge,
    #[serde(default)]
    pub reveal: RevealDef,
}

/// One motion behavior attached to an element.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BehaviorDef {
    /// Scroll-scrubbed vertical drift across the element's visible span.
    Parallax {
        /// Total travel in px over the span; negative drifts upward.
        distance: f64,
        #[serde(default = "edge_top_bottom")]
        start: Edge,
        #[serde(default = "edge_bottom_top")]
        end: Edge,
    },
    /// Generic scroll-scrubbed property ramp (overlay darkening and the like).
    Scrub {
        prop: Prop,
        from: f64,
        to: f64,
        #[serde(default = "edge_top_bottom")]
        start: Edge,
        #[serde(default = "edge_bottom_top")]
        end: Edge,
        #[serde(default)]
        ease: Ease,
    },
    /// One-shot fade-and-rise entrance.
    Reveal {
        #[serde(default = "reveal_edge")]
        at: Edge,
        #[serde(default)]
        delay: f64,
        #[serde(flatten)]
        reveal: RevealDef,
    },
    /// One-shot top-down unclip.
    ClipReveal {
        #[serde(default = "reveal_edge")]
        at: Edge,
        #[serde(default = "clip_duration")]
        duration: f64,
        #[serde(default = "clip_ease")]
        ease: Ease,
    },
    /// Endless looping tween (scroll indicator bounce).
    Loop {
        prop: Prop,
        from: f64,
        to: f64,
        duration: f64,
        #[serde(default)]
        yoyo: bool,
        #[serde(default)]
        ease: Ease,
    },
    /// Count-up to a value once the element scrolls into view.
    Counter {
        target: f64,
        #[serde(default = "counter_duration")]
        duration: f64,
        #[serde(default = "reveal_edge")]
        at: Edge,
    },
    Marquee {
        /// px/s; positive scrolls the content leftward.
        velocity: f64,
        #[serde(default = "marquee_duplication")]
        duplication: u32,
    },
    Magnetic {
        #[serde(default = "magnetic_attraction")]
        attraction: f64,
        #[serde(default = "magnetic_release")]
        release_duration: f64,
    },
    IdleFloat {
        amplitude: f64,
        period: f64,
        #[serde(default)]
        phase: f64,
    },
}

fn edge_top_bottom() -> Edge {
    Edge::TOP_BOTTOM
}

fn edge_bottom_top() -> Edge {
    Edge::BOTTOM_TOP
}

fn reveal_edge() -> Edge {
    Edge::new(0.0, 0.8)
}

fn clip_duration() -> f64 {
    1.0
}

fn clip_ease() -> Ease {
    Ease::InOutCubic
}

fn counter_duration() -> f64 {
    2.0
}

fn marquee_duplication() -> u32 {
    2
}

fn magnetic_attraction() -> f64 {
    0.3
}

fn magnetic_release() -> f64 {
    0.6
}

impl SceneDef {
    /// Structural validation: names must be unique and every cross-reference
    /// must resolve. Geometry and behavior parameters are not judged here;
    /// degenerate values degrade at runtime instead of rejecting the scene.
    pub fn validate(&self) -> ChoreoResult<()> {
        let mut seen = std::collections::HashSet::new();
        for element in &self.elements {
            if !seen.insert(element.name.as_str()) {
                return Err(ChoreoError::scene(format!(
                    "duplicate element name '{}'",
                    element.name
                )));
            }
        }
        for stagger in &self.staggers {
            if stagger.elements.is_empty() {
                return Err(ChoreoError::scene("stagger group has no elements"));
            }
            for name in &stagger.elements {
                if !seen.contains(name.as_str()) {
                    return Err(ChoreoError::scene(format!(
                        "stagger references unknown element '{name}'"
                    )));
                }
            }
        }
        if let Some(cursor) = &self.cursor {
            for name in [&cursor.dot, &cursor.ring] {
                if !seen.contains(name.as_str()) {
                    return Err(ChoreoError::scene(format!(
                        "cursor references unknown element '{name}'"
                    )));
                }
            }
        }
        Ok(())
    }
}
