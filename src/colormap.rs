/// Viridis control points, evenly spaced over [0, 1]. Perceptually
/// ordered dark-violet → teal → yellow; intermediate values are
/// linearly interpolated between neighboring stops.
const VIRIDIS: [[u8; 4]; 10] = [
    [68, 1, 84, 255],
    [72, 40, 120, 255],
    [62, 73, 137, 255],
    [49, 104, 142, 255],
    [38, 130, 142, 255],
    [31, 158, 137, 255],
    [53, 183, 121, 255],
    [109, 205, 89, 255],
    [180, 222, 44, 255],
    [253, 231, 37, 255],
];

#[inline]
pub fn lerp_color(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let t = t.clamp(0.0, 1.0);
    [
        (a[0] as f64 + (b[0] as f64 - a[0] as f64) * t).round() as u8,
        (a[1] as f64 + (b[1] as f64 - a[1] as f64) * t).round() as u8,
        (a[2] as f64 + (b[2] as f64 - a[2] as f64) * t).round() as u8,
        (a[3] as f64 + (b[3] as f64 - a[3] as f64) * t).round() as u8,
    ]
}

/// Map a scalar to a color. `value` is normalized linearly against
/// `[min, max]`; out-of-range inputs clamp to the nearest endpoint and
/// non-finite inputs land on the low end.
pub fn color_for(value: f64, min: f64, max: f64) -> [u8; 4] {
    let span = max - min;
    let t = if span > 0.0 && value.is_finite() {
        ((value - min) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let lo = scaled.floor() as usize;
    let hi = (lo + 1).min(VIRIDIS.len() - 1);
    lerp_color(VIRIDIS[lo], VIRIDIS[hi], scaled - lo as f64)
}

/// Uniform contour levels over the half-open range `[min, max)`,
/// anchored at `min`: `min, min + step, min + 2·step, ...`.
pub fn threshold_levels(min: f64, max: f64, step: f64) -> Vec<f64> {
    if step <= 0.0 || max <= min {
        return vec![];
    }
    (0..)
        .map(|k| min + k as f64 * step)
        .take_while(|&v| v < max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_hit_first_and_last_stop() {
        assert_eq!(color_for(0.0, 0.0, 1.0), VIRIDIS[0]);
        assert_eq!(color_for(1.0, 0.0, 1.0), VIRIDIS[9]);
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(color_for(-5.0, 0.0, 1.0), color_for(0.0, 0.0, 1.0));
        assert_eq!(color_for(7.0, 0.0, 1.0), color_for(1.0, 0.0, 1.0));
        assert_eq!(color_for(f64::NAN, 0.0, 1.0), VIRIDIS[0]);
    }

    #[test]
    fn default_levels_are_twenty_half_open() {
        let levels = threshold_levels(0.0, 1.0, 0.05);
        assert_eq!(levels.len(), 20);
        assert_eq!(levels[0], 0.0);
        for pair in levels.windows(2) {
            assert!(pair[1] > pair[0]);
        }
        assert!(*levels.last().unwrap() < 1.0);
    }

    #[test]
    fn degenerate_ranges_yield_no_levels() {
        assert!(threshold_levels(0.0, 1.0, 0.0).is_empty());
        assert!(threshold_levels(1.0, 0.0, 0.1).is_empty());
    }
}
