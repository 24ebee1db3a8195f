pub mod colormap;
pub mod config;
pub mod contour;
pub mod coords;
pub mod explain;
pub mod field;
pub mod grid;
pub mod horizon;
pub mod render;
pub mod scene;

use std::time::Instant;

use config::Params;
use contour::ContourBand;
use coords::{DomainBounds, Mapper, PixelRect};
use grid::Grid;
use scene::Scene;

/// Everything produced for one parameter set: the sampled field, the
/// extracted contour bands, the vector scene, and its raster. Pure
/// value; a new frame supersedes the old one wholesale.
pub struct Frame {
    pub width: usize,
    pub height: usize,
    pub domain: DomainBounds,
    pub field: Grid<f64>,
    pub thresholds: Vec<f64>,
    pub bands: Vec<ContourBand>,
    pub scene: Scene,
    pub rgba: Vec<u8>,
}

pub struct Timing {
    pub name: &'static str,
    pub ms: f64,
}

/// Run the full pipeline: sample → thresholds → contours → scene →
/// raster. Deterministic function of its inputs; no shared state
/// between invocations.
pub fn render_frame(
    sim_radius: f64,
    width: usize,
    height: usize,
    params: &Params,
) -> (Frame, Vec<Timing>) {
    let mut timings = Vec::new();
    let total_start = Instant::now();

    let domain = DomainBounds::centered(params.domain_half_extent);
    let pixel = PixelRect { width, height };
    let n = params.grid_resolution;
    let mapper = Mapper::new(domain, pixel, n, n);

    // 1. Sample the potential field over the grid
    let t = Instant::now();
    let field_grid = field::sample(domain, n, n, field::potential_well);
    timings.push(Timing {
        name: "sample",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 2. Iso-levels over the field's value domain, then contour rings
    let t = Instant::now();
    let thresholds =
        colormap::threshold_levels(field::FIELD_MIN, field::FIELD_MAX, params.contour_step);
    let bands = contour::extract_contours(&field_grid, &thresholds);
    timings.push(Timing {
        name: "contours",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 3. Project into pixel space and compose the scene
    let t = Instant::now();
    let scene = scene::compose(&bands, &mapper, sim_radius);
    timings.push(Timing {
        name: "scene",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    // 4. Rasterize
    let t = Instant::now();
    let rgba = render::rasterize(&scene);
    timings.push(Timing {
        name: "raster",
        ms: t.elapsed().as_secs_f64() * 1000.0,
    });

    timings.push(Timing {
        name: "TOTAL",
        ms: total_start.elapsed().as_secs_f64() * 1000.0,
    });

    let frame = Frame {
        width,
        height,
        domain,
        field: field_grid,
        thresholds,
        bands,
        scene,
        rgba,
    };

    (frame, timings)
}
