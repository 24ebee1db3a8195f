use rayon::prelude::*;

use crate::colormap::lerp_color;
use crate::grid::Grid;
use crate::scene::{FillLayer, Scene};

/// Per-layer scanline state: fill style plus the edge list of all
/// closed rings. Open polylines (chains broken by non-finite cells)
/// have no interior and contribute no fill edges.
struct LayerEdges {
    color: [u8; 4],
    opacity: f64,
    edges: Vec<[f64; 4]>,
}

fn collect_edges(layer: &FillLayer) -> LayerEdges {
    let mut edges = Vec::new();
    for ring in &layer.rings {
        if !ring.closed || ring.points.len() < 3 {
            continue;
        }
        let n = ring.points.len();
        for i in 0..n {
            let (x0, y0) = ring.points[i];
            let (x1, y1) = ring.points[(i + 1) % n];
            if y0 != y1 {
                edges.push([x0, y0, x1, y1]);
            }
        }
    }
    LayerEdges {
        color: layer.color,
        opacity: layer.opacity,
        edges,
    }
}

/// Even-odd crossings of the scanline at `yc`, sorted ascending.
fn scanline_crossings(edges: &[[f64; 4]], yc: f64, out: &mut Vec<f64>) {
    out.clear();
    for &[x0, y0, x1, y1] in edges {
        // Half-open span so shared vertices count once.
        if (y0 <= yc && yc < y1) || (y1 <= yc && yc < y0) {
            out.push(x0 + (yc - y0) / (y1 - y0) * (x1 - x0));
        }
    }
    out.sort_by(|a, b| a.partial_cmp(b).unwrap());
}

/// Rasterize the full scene to RGBA: contour fills (ascending level,
/// even-odd rule), axes, then the horizon layer on top.
pub fn rasterize(scene: &Scene) -> Vec<u8> {
    rasterize_inner(scene, true)
}

/// Contour fills and axes only, horizon layer omitted. Diagnostic.
pub fn rasterize_contours(scene: &Scene) -> Vec<u8> {
    rasterize_inner(scene, false)
}

fn rasterize_inner(scene: &Scene, with_horizon: bool) -> Vec<u8> {
    let (w, h) = (scene.width, scene.height);
    let layers: Vec<LayerEdges> = scene.fills.iter().map(collect_edges).collect();

    let circle = scene.horizon.circle;
    let (cx, cy) = circle.center_px;
    // The axis color's alpha is the blend factor; the raster stays
    // fully opaque.
    let axis_alpha = scene.axes[0].color[3] as f64 / 255.0;
    let axis_rgb = {
        let c = scene.axes[0].color;
        [c[0], c[1], c[2], 255]
    };
    let h_axis_row = cy.round() as isize;
    let v_axis_col = cx.round() as isize;
    let dash_period = scene.horizon.dash.0 + scene.horizon.dash.1;

    let mut rgba = vec![0u8; w * h * 4];
    rgba.par_chunks_mut(w * 4).enumerate().for_each(|(y, row)| {
        let yc = y as f64 + 0.5;
        let mut crossings = Vec::new();

        // Background.
        for x in 0..w {
            row[x * 4..x * 4 + 4].copy_from_slice(&scene.background);
        }

        // Contour fills, ascending level, even-odd rule.
        for layer in &layers {
            scanline_crossings(&layer.edges, yc, &mut crossings);
            for pair in crossings.chunks_exact(2) {
                let first = (pair[0] - 0.5).ceil().max(0.0) as usize;
                let last = ((pair[1] - 0.5).ceil() as isize).clamp(0, w as isize) as usize;
                for x in first..last {
                    let out = &mut row[x * 4..x * 4 + 4];
                    let base = [out[0], out[1], out[2], out[3]];
                    out.copy_from_slice(&lerp_color(base, layer.color, layer.opacity));
                }
            }
        }

        // Axes.
        if (0..w as isize).contains(&v_axis_col) {
            let x = v_axis_col as usize;
            let out = &mut row[x * 4..x * 4 + 4];
            let base = [out[0], out[1], out[2], out[3]];
            out.copy_from_slice(&lerp_color(base, axis_rgb, axis_alpha));
        }
        if y as isize == h_axis_row {
            for x in 0..w {
                let out = &mut row[x * 4..x * 4 + 4];
                let base = [out[0], out[1], out[2], out[3]];
                out.copy_from_slice(&lerp_color(base, axis_rgb, axis_alpha));
            }
        }

        if !with_horizon {
            return;
        }

        // Horizon: opaque fill, dashed stroke by arc length, marker.
        for x in 0..w {
            let dx = x as f64 + 0.5 - cx;
            let dy = yc - cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let out = &mut row[x * 4..x * 4 + 4];

            if dist <= circle.radius_px {
                out.copy_from_slice(&scene.horizon.fill);
            }
            if (dist - circle.radius_px).abs() <= scene.horizon.stroke_width * 0.5 {
                let arc = (dy.atan2(dx) + std::f64::consts::PI) * circle.radius_px;
                if arc.rem_euclid(dash_period) < scene.horizon.dash.0 {
                    out.copy_from_slice(&scene.horizon.stroke);
                }
            }
            if let Some(label) = &scene.horizon.label {
                // Cross marker standing in for the text glyphs; vector
                // frontends draw the text itself.
                let half = label.font_px * 0.5;
                let (mx, my) = (x as f64 + 0.5 - label.pos.0, yc - label.pos.1);
                let on_arm = (mx.abs() <= half && my.abs() <= 0.75)
                    || (my.abs() <= half && mx.abs() <= 0.75);
                if on_arm {
                    out.copy_from_slice(&label.color);
                }
            }
        }
    });

    rgba
}

/// Diagnostic: grayscale field map. Non-finite samples render black.
pub fn render_field(field: &Grid<f64>) -> Vec<u8> {
    let (lo, hi) = field.finite_range().unwrap_or((0.0, 1.0));
    let range = (hi - lo).max(f64::MIN_POSITIVE);
    let w = field.w;
    let h = field.h;
    let mut rgba = vec![0u8; w * h * 4];
    for i in 0..w * h {
        let v = field.data[i];
        let t = if v.is_finite() {
            ((v - lo) / range).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let g = (t * 255.0) as u8;
        rgba[i * 4..i * 4 + 4].copy_from_slice(&[g, g, g, 255]);
    }
    rgba
}
