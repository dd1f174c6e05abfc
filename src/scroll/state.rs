use crate::foundation::core::ScrollDirection;

/// Scroll position as seen by the rest of the engine.
///
/// `raw_offset` is the unsmoothed, input-driven target; `virtual_offset` is
/// the smoothed value every other component reads. The smoother is the only
/// writer; everything else holds `&ScrollState`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollState {
    pub raw_offset: f64,
    pub virtual_offset: f64,
    /// Virtual-offset travel speed in px/s, signed (positive = down).
    pub velocity: f64,
    pub direction: ScrollDirection,
}

impl ScrollState {
    /// Remaining gap between the raw target and the smoothed position.
    pub fn gap(&self) -> f64 {
        self.raw_offset - self.virtual_offset
    }

    pub fn is_settled(&self, eps: f64) -> bool {
        self.gap().abs() <= eps
    }
}
