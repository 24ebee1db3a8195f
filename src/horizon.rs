use serde::Serialize;

use crate::coords::{DomainBounds, PixelRect};

/// Pixel-space circle for the horizon boundary. Derived
/// deterministically from `(sim_radius, DomainBounds, PixelRect)`;
/// recomputed whenever the radius changes, never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HorizonCircle {
    pub center_px: (f64, f64),
    pub radius_px: f64,
}

/// Project the simulation-space horizon radius into pixel space.
///
/// The horizon is always centered on the domain origin. `sim_radius`
/// is a length, not a position: it goes through the multiplicative
/// length scale only. Callers keep `sim_radius` inside the configured
/// slider range; no clamping happens here.
pub fn compute_horizon(sim_radius: f64, domain: DomainBounds, pixel: PixelRect) -> HorizonCircle {
    // Same affine expressions as Mapper::domain_to_pixel /
    // domain_length_to_pixel, so the circle and the projected rings
    // land in the same frame.
    HorizonCircle {
        center_px: (
            (0.0 - domain.x_min) / domain.width() * pixel.width as f64,
            (0.0 - domain.y_min) / domain.height() * pixel.height as f64,
        ),
        radius_px: sim_radius * pixel.width as f64 / domain.width(),
    }
}
