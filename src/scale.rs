use crate::constants::{INTENSITY_CEILING, INTENSITY_FLOOR};

/// Map an aggregated value into a heat-grid intensity in `[0.2, 1.0]`.
///
/// The floor keeps the weakest cell visible. When every cell is equal
/// (`max == min`, including a single cell) the floor is returned instead of
/// dividing by zero.
pub fn normalize_intensity(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return INTENSITY_FLOOR;
    }

    let span = INTENSITY_CEILING - INTENSITY_FLOOR;
    let t = INTENSITY_FLOOR + span * (value - min) / (max - min);
    if t.is_nan() {
        return INTENSITY_FLOOR;
    }
    t.clamp(INTENSITY_FLOOR, INTENSITY_CEILING)
}

/// Width of a ranked-list bar relative to the largest total.
pub fn bar_fraction(value: f64, max: f64) -> f64 {
    if max <= 0.0 || !max.is_finite() {
        return 0.0;
    }
    (value / max).clamp(0.0, 1.0)
}
