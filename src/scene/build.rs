//! Scene builder: registers a validated [`SceneDef`] against a fresh engine.

use std::collections::HashMap;

use crate::animation::tween::{TweenSpec, staggered};
use crate::effects::{
    EffectConfig, IdleFloatConfig, MagneticConfig, MarqueeConfig, PointerFollowerConfig,
};
use crate::engine::host::Prop;
use crate::engine::scheduler::{Engine, EngineConfig};
use crate::foundation::core::ElementId;
use crate::foundation::error::{ChoreoError, ChoreoResult};
use crate::scene::model::{BehaviorDef, RevealDef, SceneDef};

/// Build a running engine from a scene definition.
///
/// Elements are registered in declaration order, then behaviors, stagger
/// groups, and the cursor. The returned engine has not run a frame yet.
#[tracing::instrument(skip(scene), fields(elements = scene.elements.len()))]
pub fn build_scene(scene: &SceneDef) -> ChoreoResult<Engine> {
    scene.validate()?;

    let mut engine = Engine::new(EngineConfig {
        viewport: scene.viewport,
        content_height: scene.content_height,
        smoother: scene.smoother,
    });

    let mut ids: HashMap<&str, ElementId> = HashMap::new();
    for element in &scene.elements {
        let id = engine.add_element(element.bounds, element.interactive);
        ids.insert(element.name.as_str(), id);
    }

    for element in &scene.elements {
        let id = ids[element.name.as_str()];
        for behavior in &element.behaviors {
            register_behavior(&mut engine, id, behavior)?;
        }
    }

    for stagger in &scene.staggers {
        let members: Vec<ElementId> = stagger
            .elements
            .iter()
            .map(|name| ids[name.as_str()])
            .collect();
        let specs = members
            .iter()
            .map(|&member| reveal_spec(member, &stagger.reveal, 0.0))
            .collect();
        // One trigger on the first member starts the whole cascade.
        engine.register_one_shot_trigger(
            members[0],
            stagger.at,
            staggered(specs, stagger.base, stagger.step),
        );
    }

    if let Some(cursor) = &scene.cursor {
        let dot = ids[cursor.dot.as_str()];
        let ring = ids[cursor.ring.as_str()];
        engine.register_effect(EffectConfig::PointerFollower(PointerFollowerConfig::new(
            dot, ring,
        )))?;
    }

    tracing::debug!(behaviors = engine.active_behaviors(), "scene built");
    Ok(engine)
}

fn register_behavior(
    engine: &mut Engine,
    id: ElementId,
    behavior: &BehaviorDef,
) -> ChoreoResult<()> {
    match *behavior {
        BehaviorDef::Parallax {
            distance,
            start,
            end,
        } => {
            engine.register_scrub_trigger(
                id,
                start,
                end,
                TweenSpec::scrubbed(id).with_track(Prop::TranslateY, 0.0, distance),
            );
        }
        BehaviorDef::Scrub {
            prop,
            from,
            to,
            start,
            end,
            ease,
        } => {
            engine.register_scrub_trigger(
                id,
                start,
                end,
                TweenSpec::scrubbed(id)
                    .with_track(prop, from, to)
                    .with_ease(ease),
            );
        }
        BehaviorDef::Reveal { at, delay, reveal } => {
            engine.register_one_shot_trigger(id, at, vec![reveal_spec(id, &reveal, delay)]);
        }
        BehaviorDef::ClipReveal { at, duration, ease } => {
            engine.register_one_shot_trigger(
                id,
                at,
                vec![
                    TweenSpec::over(id, duration)
                        .with_track(Prop::ClipTop, 1.0, 0.0)
                        .with_ease(ease),
                ],
            );
        }
        BehaviorDef::Loop {
            prop,
            from,
            to,
            duration,
            yoyo,
            ease,
        } => {
            if duration <= 0.0 {
                return Err(ChoreoError::scene("loop behavior needs a positive duration"));
            }
            engine.start_tween(
                TweenSpec::over(id, duration)
                    .with_track(prop, from, to)
                    .with_ease(ease)
                    .with_repeat(-1, yoyo),
            );
        }
        BehaviorDef::Counter {
            target,
            duration,
            at,
        } => {
            engine.attach_counter_at(id, target, duration, at);
        }
        BehaviorDef::Marquee {
            velocity,
            duplication,
        } => {
            let mut config = MarqueeConfig::new(id, velocity);
            config.duplication = duplication;
            engine.register_effect(EffectConfig::Marquee(config))?;
        }
        BehaviorDef::Magnetic {
            attraction,
            release_duration,
        } => {
            let mut config = MagneticConfig::new(id);
            config.attraction = attraction;
            config.release_duration = release_duration;
            engine.register_effect(EffectConfig::Magnetic(config))?;
        }
        BehaviorDef::IdleFloat {
            amplitude,
            period,
            phase,
        } => {
            engine.register_effect(EffectConfig::IdleFloat(
                IdleFloatConfig::new(id, amplitude, period).with_phase(phase),
            ))?;
        }
    }
    Ok(())
}

fn reveal_spec(target: ElementId, reveal: &RevealDef, delay: f64) -> TweenSpec {
    TweenSpec::over(target, reveal.duration)
        .with_track(Prop::Opacity, 0.0, 1.0)
        .with_track(Prop::TranslateY, reveal.offset_y, 0.0)
        .with_ease(reveal.ease)
        .with_delay(delay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Rect, Viewport};
    use crate::scene::model::{CursorDef, ElementDef, StaggerDef};
    use crate::scroll::smoother::SmootherConfig;
    use crate::trigger::registry::Edge;

    fn element(name: &str, bounds: Rect) -> ElementDef {
        ElementDef {
            name: name.to_string(),
            bounds,
            interactive: false,
            behaviors: Vec::new(),
        }
    }

    fn scene() -> SceneDef {
        SceneDef {
            viewport: Viewport::new(1280.0, 800.0),
            content_height: 4000.0,
            smoother: SmootherConfig::default(),
            elements: Vec::new(),
            staggers: Vec::new(),
            cursor: None,
        }
    }

    #[test]
    fn registers_one_behavior_per_definition() {
        let mut def = scene();
        let mut hero = element("hero", Rect::new(0.0, 0.0, 1280.0, 900.0));
        hero.behaviors.push(BehaviorDef::Parallax {
            distance: -120.0,
            start: Edge::TOP_BOTTOM,
            end: Edge::BOTTOM_TOP,
        });
        hero.behaviors.push(BehaviorDef::Counter {
            target: 500.0,
            duration: 2.0,
            at: Edge::new(0.0, 0.8),
        });
        def.elements.push(hero);

        let engine = build_scene(&def).unwrap();
        // parallax = trigger + bound tween; counter = counter + its trigger
        assert_eq!(engine.active_behaviors(), 4);
    }

    #[test]
    fn invalid_scenes_do_not_build() {
        let mut def = scene();
        def.cursor = Some(CursorDef {
            dot: "nope".to_string(),
            ring: "nope".to_string(),
        });
        assert!(build_scene(&def).is_err());
    }

    #[test]
    fn loop_with_zero_duration_is_rejected() {
        let mut def = scene();
        let mut el = element("indicator", Rect::new(0.0, 0.0, 10.0, 10.0));
        el.behaviors.push(BehaviorDef::Loop {
            prop: Prop::TranslateY,
            from: 0.0,
            to: 8.0,
            duration: 0.0,
            yoyo: true,
            ease: crate::animation::ease::Ease::Linear,
        });
        def.elements.push(el);
        assert!(build_scene(&def).is_err());
    }

    #[test]
    fn stagger_cascade_reveals_members_in_order() {
        let mut def = scene();
        for (i, name) in ["card-0", "card-1", "card-2"].iter().enumerate() {
            let x = i as f64 * 420.0;
            def.elements
                .push(element(name, Rect::new(x, 1200.0, x + 400.0, 1500.0)));
        }
        def.staggers.push(StaggerDef {
            elements: vec![
                "card-0".to_string(),
                "card-1".to_string(),
                "card-2".to_string(),
            ],
            base: 0.0,
            step: 0.12,
            at: Edge::new(0.0, 0.8),
            reveal: RevealDef::default(),
        });

        let mut engine = build_scene(&def).unwrap();
        // Cross the trigger line (1200 - 0.8 * 800 = 560), then run 100 ms:
        // card-0 is underway, card-2 has not started.
        engine.scroll_to(600.0, true);
        for _ in 0..6 {
            engine.frame(1.0 / 60.0).unwrap();
        }
        let first = engine.store().props(ElementId(0)).unwrap().opacity;
        let last = engine.store().props(ElementId(2)).unwrap().opacity;
        assert!(first > 0.0 && first < 1.0, "entrance underway");
        assert_eq!(last, 1.0, "untouched until its delayed start");
    }

    #[test]
    fn cursor_attaches_a_follower() {
        let mut def = scene();
        def.elements
            .push(element("dot", Rect::new(0.0, 0.0, 12.0, 12.0)));
        def.elements
            .push(element("ring", Rect::new(0.0, 0.0, 40.0, 40.0)));
        def.cursor = Some(CursorDef {
            dot: "dot".to_string(),
            ring: "ring".to_string(),
        });
        let engine = build_scene(&def).unwrap();
        assert_eq!(engine.active_behaviors(), 1);
    }
}
