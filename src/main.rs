use std::path::PathBuf;

use horizonviz::config::Params;
use horizonviz::render;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let params = Params::default();
    let radius: f64 = args
        .get(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(params.default_radius)
        .clamp(params.min_radius, params.max_radius);
    let size: usize = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(500);
    let out_dir: PathBuf = args
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    std::fs::create_dir_all(&out_dir).expect("failed to create output directory");

    eprintln!(
        "Rendering {}x{} frame with radius={:.2}, grid={}, step={}",
        size, size, radius, params.grid_resolution, params.contour_step
    );

    let (frame, timings) = horizonviz::render_frame(radius, size, size, &params);

    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.1} ms", t.name, t.ms);
    }

    let save = |name: &str, rgba: &[u8], w: usize, h: usize| {
        let path = out_dir.join(name);
        image::save_buffer(&path, rgba, w as u32, h as u32, image::ColorType::Rgba8)
            .expect("failed to save image");
        eprintln!("Saved {}", path.display());
    };

    // 1. Grayscale field
    let field_rgba = render::render_field(&frame.field);
    save("field.png", &field_rgba, frame.field.w, frame.field.h);

    // 2. Contour fills without the horizon layer
    let contours_rgba = render::rasterize_contours(&frame.scene);
    save("contours.png", &contours_rgba, size, size);

    // 3. Full composite
    save("composite.png", &frame.rgba, size, size);

    eprintln!("\nDone.");
}
