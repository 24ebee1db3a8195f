use serde::Serialize;

/// Simulation-space rectangle covered by the grid.
/// Invariant: `x_max > x_min`, `y_max > y_min`.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct DomainBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl DomainBounds {
    /// Square domain centered on the origin: `[-half, half]²`.
    pub fn centered(half_extent: f64) -> Self {
        Self {
            x_min: -half_extent,
            x_max: half_extent,
            y_min: -half_extent,
            y_max: half_extent,
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

/// Output raster size in pixels. Both dimensions > 0; the caller keeps
/// the aspect square when the domain is square.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct PixelRect {
    pub width: usize,
    pub height: usize,
}

/// Affine transforms between grid-index, domain, and pixel space.
///
/// Grid index `i` spans `[0, n_cols)` and maps linearly onto
/// `[x_min, x_max)`, so `i = n_cols / 2` lands exactly on the domain
/// center. All transforms are pure; forward/inverse pairs compose to
/// the identity up to floating-point rounding.
#[derive(Clone, Copy, Debug)]
pub struct Mapper {
    pub domain: DomainBounds,
    pub pixel: PixelRect,
    pub n_cols: usize,
    pub n_rows: usize,
}

impl Mapper {
    pub fn new(domain: DomainBounds, pixel: PixelRect, n_cols: usize, n_rows: usize) -> Self {
        debug_assert!(n_cols > 0 && n_rows > 0);
        debug_assert!(pixel.width > 0 && pixel.height > 0);
        Self {
            domain,
            pixel,
            n_cols,
            n_rows,
        }
    }

    #[inline]
    pub fn grid_to_domain(&self, i: f64, j: f64) -> (f64, f64) {
        (
            self.domain.x_min + (i / self.n_cols as f64) * self.domain.width(),
            self.domain.y_min + (j / self.n_rows as f64) * self.domain.height(),
        )
    }

    #[inline]
    pub fn domain_to_grid(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.domain.x_min) / self.domain.width() * self.n_cols as f64,
            (y - self.domain.y_min) / self.domain.height() * self.n_rows as f64,
        )
    }

    #[inline]
    pub fn domain_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (x - self.domain.x_min) / self.domain.width() * self.pixel.width as f64,
            (y - self.domain.y_min) / self.domain.height() * self.pixel.height as f64,
        )
    }

    #[inline]
    pub fn pixel_to_domain(&self, px: f64, py: f64) -> (f64, f64) {
        (
            self.domain.x_min + px / self.pixel.width as f64 * self.domain.width(),
            self.domain.y_min + py / self.pixel.height as f64 * self.domain.height(),
        )
    }

    /// Scale for a domain-space length (a radius, not a position):
    /// multiplicative factor only, no translation.
    #[inline]
    pub fn domain_length_to_pixel(&self, len: f64) -> f64 {
        len * self.pixel.width as f64 / self.domain.width()
    }

    /// Direct grid→pixel map used when projecting contour rings.
    /// Defined as the composition of `grid_to_domain` and
    /// `domain_to_pixel`, so ring paths and the horizon circle land in
    /// the same frame pixel-for-pixel.
    #[inline]
    pub fn grid_to_pixel(&self, i: f64, j: f64) -> (f64, f64) {
        let (x, y) = self.grid_to_domain(i, j);
        self.domain_to_pixel(x, y)
    }
}
