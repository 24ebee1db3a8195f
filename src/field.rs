use rayon::prelude::*;

use crate::coords::DomainBounds;
use crate::grid::Grid;

/// Value domain of the default field, used for colormap normalization
/// and threshold generation.
pub const FIELD_MIN: f64 = 0.0;
pub const FIELD_MAX: f64 = 1.0;

/// Radially symmetric potential well: `exp(-(x² + y²))`.
/// Peaks at 1.0 on the origin, falls toward 0 at the domain edge.
#[inline]
pub fn potential_well(x: f64, y: f64) -> f64 {
    (-(x * x + y * y)).exp()
}

/// Sample `f` over a regular `n_cols × n_rows` grid covering `domain`.
///
/// Grid index `(i, j)` maps to domain coordinates the same way the
/// contour projection does (`[0, n)` onto the bounds), so sampled rings
/// and the horizon circle share one frame. `f` is total over the
/// domain; non-finite outputs are stored unmodified and left to the
/// extractor to exclude. Pure and row-parallel.
pub fn sample<F>(domain: DomainBounds, n_cols: usize, n_rows: usize, f: F) -> Grid<f64>
where
    F: Fn(f64, f64) -> f64 + Sync,
{
    let mut grid = Grid::new(n_cols, n_rows);

    // Same affine expression as Mapper::grid_to_domain, bit-for-bit.
    grid.data.par_chunks_mut(n_cols).enumerate().for_each(|(j, row)| {
        let y = domain.y_min + (j as f64 / n_rows as f64) * domain.height();
        for (i, out) in row.iter_mut().enumerate() {
            let x = domain.x_min + (i as f64 / n_cols as f64) * domain.width();
            *out = f(x, y);
        }
    });

    grid
}
