/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Gap decay per `duration` seconds of smoothing: after `duration` the
/// remaining gap is 0.1% of the original.
const DECAY: f64 = 6.907_755_278_982_137; // ln(1000)

/// Per-frame smoothing factor for exponential convergence toward a target,
/// compensated for the frame delta so convergence speed is independent of
/// frame rate. Always in `[0, 1)` for `dt >= 0` and finite `duration > 0`.
pub fn smoothing_alpha(dt: f64, duration: f64) -> f64 {
    if dt <= 0.0 {
        return 0.0;
    }
    if duration <= 0.0 {
        // Degenerate smoothing window: converge immediately.
        return 1.0;
    }
    1.0 - (-dt * DECAY / duration).exp()
}

pub fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
