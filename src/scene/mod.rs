//! Declarative page choreography: a serde model of elements and their
//! behaviors, and a builder that registers the whole scene against a fresh
//! engine.

pub mod build;
pub mod model;

pub use build::build_scene;
pub use model::{BehaviorDef, CursorDef, ElementDef, RevealDef, SceneDef, StaggerDef};
