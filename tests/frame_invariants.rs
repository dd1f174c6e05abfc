//! Cross-module invariants driven through the public engine API, including
//! irregular frame timing.

use choreo::{
    Edge, Engine, EngineConfig, InputEvent, Prop, Rect, TweenSpec, Viewport,
};

/// Deterministic dt sequence jittered around `1 / fps` (SplitMix64 stream).
struct Jitter {
    state: u64,
    base: f64,
}

impl Jitter {
    fn new(seed: u64, fps: f64) -> Self {
        Self {
            state: seed,
            base: 1.0 / fps,
        }
    }

    fn next_dt(&mut self) -> f64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        // +/- 40% around the nominal frame time.
        let unit = (z >> 11) as f64 / (1u64 << 53) as f64;
        self.base * (0.6 + 0.8 * unit)
    }
}

fn engine() -> Engine {
    Engine::new(EngineConfig::new(Viewport::new(1280.0, 800.0), 6000.0))
}

#[test]
fn counter_lands_exactly_under_any_frame_rate() {
    for (fps, seed) in [(30.0, 7u64), (144.0, 1234u64)] {
        let mut e = engine();
        let el = e.add_element(Rect::new(0.0, 1500.0, 300.0, 1600.0), false);
        e.attach_counter(el, 500.0, 2.0);
        e.scroll_to(1500.0, true);

        let mut jitter = Jitter::new(seed, fps);
        let mut elapsed = 0.0;
        while elapsed < 2.5 {
            let dt = jitter.next_dt();
            elapsed += dt;
            e.frame(dt).unwrap();
        }
        let text = e.store().props(el).unwrap().text.clone();
        assert_eq!(text.as_deref(), Some("500"), "at {fps} fps");
    }
}

#[test]
fn one_shot_never_replays_on_recrossing() {
    let mut e = engine();
    let el = e.add_element(Rect::new(0.0, 1000.0, 100.0, 1200.0), false);
    // 0.5s entrance; once finished, opacity must stay at 1 forever.
    e.register_one_shot_trigger(
        el,
        Edge::TOP_BOTTOM,
        vec![TweenSpec::over(el, 0.5).with_track(Prop::Opacity, 0.0, 1.0)],
    );

    e.scroll_to(500.0, true);
    for _ in 0..60 {
        e.frame(1.0 / 60.0).unwrap();
    }
    assert_eq!(e.store().props(el).unwrap().opacity, 1.0);

    // Back above the trigger line, then across it again, twice.
    for offset in [0.0, 800.0, 0.0, 1200.0] {
        e.scroll_to(offset, true);
        for _ in 0..30 {
            e.frame(1.0 / 60.0).unwrap();
            assert_eq!(
                e.store().props(el).unwrap().opacity,
                1.0,
                "a second entrance started"
            );
        }
    }
}

#[test]
fn scrub_output_is_monotone_for_monotone_scrolling() {
    let mut e = engine();
    let el = e.add_element(Rect::new(0.0, 1000.0, 100.0, 1800.0), false);
    e.register_scrub_trigger(
        el,
        Edge::TOP_BOTTOM,
        Edge::BOTTOM_TOP,
        TweenSpec::scrubbed(el).with_track(Prop::TranslateY, 0.0, 200.0),
    );

    let mut jitter = Jitter::new(99, 60.0);
    let mut prev = f64::NEG_INFINITY;
    for _ in 0..400 {
        e.handle_input(InputEvent::Wheel { delta_y: 12.0 });
        e.frame(jitter.next_dt()).unwrap();
        let y = e.store().props(el).unwrap().translate_y;
        assert!(y >= prev, "scrub went backwards on forward scroll");
        prev = y;
    }
    assert!(prev > 0.0, "never entered the span");
}

#[test]
fn smoother_converges_under_irregular_timing() {
    let mut e = engine();
    e.handle_input(InputEvent::Wheel { delta_y: 3000.0 });

    let mut jitter = Jitter::new(42, 60.0);
    let mut elapsed = 0.0;
    let mut prev = 0.0;
    while elapsed < 6.0 {
        let dt = jitter.next_dt();
        elapsed += dt;
        e.frame(dt).unwrap();
        let v = e.scroll_state().virtual_offset;
        assert!(v >= prev, "not monotone");
        assert!(v <= 3000.0, "overshoot");
        prev = v;
    }
    assert_eq!(e.scroll_state().virtual_offset, 3000.0);
}

#[test]
fn stagger_starts_are_spaced_exactly() {
    let mut e = engine();
    let mut elements = Vec::new();
    for i in 0..10 {
        let y = 100.0 * i as f64;
        elements.push(e.add_element(Rect::new(0.0, y, 50.0, y + 50.0), false));
    }
    let specs = elements
        .iter()
        .map(|&el| TweenSpec::over(el, 0.05).with_track(Prop::Opacity, 0.0, 1.0))
        .collect();
    e.start_staggered(specs, 0.0, 0.1);

    // Walk time in exact 10ms steps; element i must first move in the frame
    // after 100 * i ms.
    let mut started = [false; 10];
    let mut first_start_ms = [0u32; 10];
    for step in 1..=120u32 {
        e.frame(0.01).unwrap();
        for (i, &el) in elements.iter().enumerate() {
            if !started[i] && e.store().props(el).unwrap().opacity < 1.0 {
                started[i] = true;
                first_start_ms[i] = step * 10;
            }
        }
    }
    for (i, &ms) in first_start_ms.iter().enumerate() {
        assert!(started[i], "element {i} never started");
        if i > 0 {
            let spacing = ms as i64 - first_start_ms[i - 1] as i64;
            // 100ms apart, within one 10ms frame of timing quantization.
            assert!((spacing - 100).abs() <= 10, "element {i}: spacing {spacing}ms");
        }
    }
}
