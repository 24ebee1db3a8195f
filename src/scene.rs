//! Immutable per-frame scene description.
//!
//! The pure pipeline produces one `Scene` per parameter change; the
//! rendering layer (raster or frontend) redraws from it. Nothing in
//! here is mutated after composition.

use serde::Serialize;

use crate::colormap;
use crate::contour::ContourBand;
use crate::coords::Mapper;
use crate::field::{FIELD_MAX, FIELD_MIN};
use crate::horizon::{HorizonCircle, compute_horizon};

// Visual policy for the horizon layer and chrome.
pub const BACKGROUND: [u8; 4] = [24, 24, 27, 255];
pub const CONTOUR_OPACITY: f64 = 0.8;
pub const HORIZON_FILL: [u8; 4] = [0, 0, 0, 255];
pub const HORIZON_STROKE: [u8; 4] = [244, 63, 94, 255];
pub const HORIZON_STROKE_WIDTH: f64 = 2.0;
pub const HORIZON_DASH: (f64, f64) = (4.0, 4.0);
pub const AXIS_COLOR: [u8; 4] = [255, 255, 255, 51];
/// Below this pixel radius there is no room for the centered label.
pub const LABEL_MIN_RADIUS_PX: f64 = 20.0;
pub const LABEL_TEXT: &str = "dt ↔ dr";

/// Contour ring projected into pixel space.
#[derive(Clone, Debug, Serialize)]
pub struct PixelRing {
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

/// All rings of one threshold level plus its fill style. Layers are
/// stacked in ascending level order under even-odd fill.
#[derive(Clone, Debug, Serialize)]
pub struct FillLayer {
    pub level: f64,
    pub color: [u8; 4],
    pub opacity: f64,
    pub rings: Vec<PixelRing>,
}

#[derive(Clone, Copy, Debug, Serialize)]
pub struct AxisLine {
    pub from: (f64, f64),
    pub to: (f64, f64),
    pub color: [u8; 4],
}

/// Centered marker inside the horizon. Presentational only.
#[derive(Clone, Debug, Serialize)]
pub struct LabelMarker {
    pub text: String,
    pub pos: (f64, f64),
    pub font_px: f64,
    pub color: [u8; 4],
}

/// The horizon circle with its composition policy: opaque fill over
/// the contour layer, dashed stroke outline, optional label.
#[derive(Clone, Debug, Serialize)]
pub struct HorizonLayer {
    pub circle: HorizonCircle,
    pub fill: [u8; 4],
    pub stroke: [u8; 4],
    pub stroke_width: f64,
    pub dash: (f64, f64),
    pub label: Option<LabelMarker>,
}

/// Complete drawable description of one frame.
#[derive(Clone, Debug, Serialize)]
pub struct Scene {
    pub width: usize,
    pub height: usize,
    pub background: [u8; 4],
    pub fills: Vec<FillLayer>,
    pub axes: [AxisLine; 2],
    pub horizon: HorizonLayer,
}

/// Compose the scene: project contour bands into pixel space, colorize
/// per level, and layer the horizon circle on top.
pub fn compose(bands: &[ContourBand], mapper: &Mapper, sim_radius: f64) -> Scene {
    let fills = bands
        .iter()
        .map(|band| FillLayer {
            level: band.level,
            color: colormap::color_for(band.level, FIELD_MIN, FIELD_MAX),
            opacity: CONTOUR_OPACITY,
            rings: band
                .rings
                .iter()
                .map(|ring| PixelRing {
                    points: ring
                        .points
                        .iter()
                        .map(|&(i, j)| mapper.grid_to_pixel(i, j))
                        .collect(),
                    closed: ring.closed,
                })
                .collect(),
        })
        .collect();

    let circle = compute_horizon(sim_radius, mapper.domain, mapper.pixel);
    let (cx, cy) = circle.center_px;
    let (w, h) = (mapper.pixel.width as f64, mapper.pixel.height as f64);

    let label = (circle.radius_px > LABEL_MIN_RADIUS_PX).then(|| LabelMarker {
        text: LABEL_TEXT.to_string(),
        pos: circle.center_px,
        font_px: (circle.radius_px / 3.0).min(14.0),
        color: HORIZON_STROKE,
    });

    Scene {
        width: mapper.pixel.width,
        height: mapper.pixel.height,
        background: BACKGROUND,
        fills,
        axes: [
            AxisLine {
                from: (cx, 0.0),
                to: (cx, h),
                color: AXIS_COLOR,
            },
            AxisLine {
                from: (0.0, cy),
                to: (w, cy),
                color: AXIS_COLOR,
            },
        ],
        horizon: HorizonLayer {
            circle,
            fill: HORIZON_FILL,
            stroke: HORIZON_STROKE,
            stroke_width: HORIZON_STROKE_WIDTH,
            dash: HORIZON_DASH,
            label,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{DomainBounds, PixelRect};

    fn mapper() -> Mapper {
        Mapper::new(
            DomainBounds::centered(2.2),
            PixelRect {
                width: 500,
                height: 500,
            },
            120,
            120,
        )
    }

    #[test]
    fn label_requires_visible_radius() {
        let m = mapper();
        // 20 px ≙ 0.176 sim units at 500 px over 4.4 units.
        let small = compose(&[], &m, 0.1);
        assert!(small.horizon.label.is_none());
        let large = compose(&[], &m, 1.0);
        let label = large.horizon.label.unwrap();
        assert_eq!(label.text, LABEL_TEXT);
        assert!((label.font_px - 14.0).abs() < 1e-12);
    }

    #[test]
    fn axes_cross_at_the_circle_center() {
        let scene = compose(&[], &mapper(), 1.0);
        let (cx, cy) = scene.horizon.circle.center_px;
        assert_eq!(scene.axes[0].from.0, cx);
        assert_eq!(scene.axes[1].from.1, cy);
    }
}
