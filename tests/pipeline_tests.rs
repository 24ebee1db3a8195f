//! End-to-end pipeline properties.

use horizonviz::config::Params;
use horizonviz::render_frame;
use horizonviz::scene::{BACKGROUND, HORIZON_FILL};

#[test]
fn end_to_end_default_scenario() {
    let params = Params::default();
    let (frame, timings) = render_frame(1.0, 500, 500, &params);

    let circle = frame.scene.horizon.circle;
    assert_eq!(circle.center_px, (250.0, 250.0));
    let expected = 500.0 / 4.4;
    assert!((circle.radius_px - expected).abs() / expected < 1e-9);

    // 20 thresholds over [0, 1), anchored at 0.
    assert_eq!(frame.thresholds.len(), 20);
    assert_eq!(frame.thresholds[0], 0.0);
    assert!(frame.thresholds.windows(2).all(|w| w[1] > w[0]));

    assert_eq!(frame.bands.len(), frame.thresholds.len());
    assert_eq!(frame.rgba.len(), 500 * 500 * 4);
    assert!(timings.iter().any(|t| t.name == "TOTAL"));
}

#[test]
fn field_peaks_at_one_on_the_center_cell() {
    let (frame, _) = render_frame(1.0, 500, 500, &Params::default());
    let grid = &frame.field;
    let mut best = (0usize, 0usize, f64::NEG_INFINITY);
    for j in 0..grid.h {
        for i in 0..grid.w {
            let v = grid.get(i, j);
            if v > best.2 {
                best = (i, j, v);
            }
        }
    }
    assert_eq!((best.0, best.1), (60, 60));
    assert_eq!(best.2, 1.0);
}

#[test]
fn horizon_radius_monotonic_across_frames() {
    let params = Params::default();
    let mut prev = f64::NEG_INFINITY;
    for k in 0..=8 {
        let radius = params.min_radius + k as f64 * 0.2;
        let radius = radius.min(params.max_radius);
        let (frame, _) = render_frame(radius, 300, 300, &params);
        let r_px = frame.scene.horizon.circle.radius_px;
        let expected = radius * 300.0 / 4.4;
        assert!((r_px - expected).abs() / expected < 1e-9);
        assert!(r_px > prev);
        prev = r_px;
    }
}

#[test]
fn pipeline_is_deterministic() {
    let params = Params::default();
    let (a, _) = render_frame(1.3, 400, 400, &params);
    let (b, _) = render_frame(1.3, 400, 400, &params);

    assert_eq!(a.field, b.field);
    assert_eq!(a.bands, b.bands);
    assert_eq!(a.scene.horizon.circle, b.scene.horizon.circle);
    assert_eq!(a.rgba, b.rgba);
}

#[test]
fn composite_has_opaque_horizon_fill_over_contours() {
    let (frame, _) = render_frame(1.0, 500, 500, &Params::default());
    let px = |x: usize, y: usize| {
        let i = (y * 500 + x) * 4;
        [
            frame.rgba[i],
            frame.rgba[i + 1],
            frame.rgba[i + 2],
            frame.rgba[i + 3],
        ]
    };

    // Inside the circle (r_px ≈ 113.6), off the axes, marker, and
    // stroke: the opaque void.
    assert_eq!(px(306, 250), HORIZON_FILL);
    assert_eq!(px(250 - 80, 250 + 40), HORIZON_FILL);

    // Outside the circle but inside the low iso-levels: colormapped
    // fill, not the bare background.
    assert_ne!(px(260, 100), BACKGROUND);

    // Far corner sits below the lowest positive level: background
    // only (the level-0 band has no crossings anywhere).
    assert_eq!(px(2, 2), BACKGROUND);
}
