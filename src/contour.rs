//! Iso-contour extraction with marching squares.
//!
//! For each threshold level, every 2×2 cell block is classified by
//! which corners sit at or above the level, crossing points are
//! interpolated along the crossed edges, and the resulting segments
//! are chained into rings by exact shared-endpoint matching.
//!
//! Saddle blocks (two diagonally opposite corners above) are resolved
//! by the cell-center average: center `>= level` connects the two
//! above-corners into one region, otherwise they separate. The rule is
//! applied uniformly at every level.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::grid::Grid;

/// One polygon at a single level, in grid-index space (float coords).
/// `closed` rings carry a uniform winding (positive shoelace area);
/// open polylines only occur where a chain ran into excluded
/// (non-finite) cells.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourRing {
    pub points: Vec<(f64, f64)>,
    pub closed: bool,
}

/// All rings separating `< level` from `>= level`, for one level.
/// Holes are separate rings; even-odd fill renders them correctly.
#[derive(Clone, Debug, PartialEq)]
pub struct ContourBand {
    pub level: f64,
    pub rings: Vec<ContourRing>,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    start: (f64, f64),
    end: (f64, f64),
}

/// Extract contour rings for every threshold, ascending. A level with
/// no crossings yields an empty ring list, not an error.
pub fn extract_contours(grid: &Grid<f64>, thresholds: &[f64]) -> Vec<ContourBand> {
    debug_assert!(thresholds.windows(2).all(|w| w[1] > w[0]));
    thresholds
        .par_iter()
        .map(|&level| ContourBand {
            level,
            rings: chain_segments(&march_level(grid, level)),
        })
        .collect()
}

/// Marching-squares pass for a single level. Cells with any non-finite
/// corner produce no segments: no contour is drawn through a
/// non-finite sample.
fn march_level(grid: &Grid<f64>, level: f64) -> Vec<Segment> {
    let (w, h) = (grid.w, grid.h);
    if w < 2 || h < 2 {
        return vec![];
    }

    let mut segments = Vec::new();
    for y in 0..h - 1 {
        for x in 0..w - 1 {
            let tl = grid.get(x, y);
            let tr = grid.get(x + 1, y);
            let bl = grid.get(x, y + 1);
            let br = grid.get(x + 1, y + 1);

            if !(tl.is_finite() && tr.is_finite() && bl.is_finite() && br.is_finite()) {
                continue;
            }

            let mut case = 0u8;
            if tl >= level {
                case |= 1;
            }
            if tr >= level {
                case |= 2;
            }
            if br >= level {
                case |= 4;
            }
            if bl >= level {
                case |= 8;
            }

            cell_segments(case, x as f64, y as f64, tl, tr, br, bl, level, &mut segments);
        }
    }
    segments
}

/// Crossing points per edge, corner order canonical (left→right for
/// horizontal edges, top→bottom for vertical ones) so both cells
/// sharing an edge compute the identical point bit-for-bit.
#[allow(clippy::too_many_arguments)]
fn cell_segments(
    case: u8,
    x: f64,
    y: f64,
    tl: f64,
    tr: f64,
    br: f64,
    bl: f64,
    level: f64,
    out: &mut Vec<Segment>,
) {
    let top = || interpolate_edge(x, y, x + 1.0, y, tl, tr, level);
    let bottom = || interpolate_edge(x, y + 1.0, x + 1.0, y + 1.0, bl, br, level);
    let left = || interpolate_edge(x, y, x, y + 1.0, tl, bl, level);
    let right = || interpolate_edge(x + 1.0, y, x + 1.0, y + 1.0, tr, br, level);

    let mut seg = |a: (f64, f64), b: (f64, f64)| out.push(Segment { start: a, end: b });

    match case {
        0 | 15 => {}
        1 | 14 => seg(left(), top()),
        2 | 13 => seg(top(), right()),
        3 | 12 => seg(left(), right()),
        4 | 11 => seg(right(), bottom()),
        6 | 9 => seg(top(), bottom()),
        7 | 8 => seg(left(), bottom()),
        5 => {
            // Saddle: tl and br above. Center average decides whether
            // they join through the middle.
            if (tl + tr + br + bl) * 0.25 >= level {
                seg(top(), right());
                seg(left(), bottom());
            } else {
                seg(left(), top());
                seg(right(), bottom());
            }
        }
        10 => {
            // Saddle: tr and bl above.
            if (tl + tr + br + bl) * 0.25 >= level {
                seg(left(), top());
                seg(right(), bottom());
            } else {
                seg(top(), right());
                seg(left(), bottom());
            }
        }
        _ => unreachable!(),
    }
}

/// Linear interpolation of the level crossing along one edge.
fn interpolate_edge(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    v1: f64,
    v2: f64,
    level: f64,
) -> (f64, f64) {
    if (v2 - v1).abs() < 1e-12 {
        return ((x1 + x2) * 0.5, (y1 + y2) * 0.5);
    }
    let t = ((level - v1) / (v2 - v1)).clamp(0.0, 1.0);
    (x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

#[inline]
fn key(p: (f64, f64)) -> (u64, u64) {
    // Shared-edge crossings are computed identically in both adjacent
    // cells, so exact bit equality is the right join.
    (p.0.to_bits(), p.1.to_bits())
}

/// Chain unordered segments into rings. Closed rings are normalized to
/// positive shoelace area so every ring at every level shares one
/// winding convention.
fn chain_segments(segments: &[Segment]) -> Vec<ContourRing> {
    let mut by_endpoint: HashMap<(u64, u64), Vec<usize>> = HashMap::new();
    for (i, s) in segments.iter().enumerate() {
        by_endpoint.entry(key(s.start)).or_default().push(i);
        by_endpoint.entry(key(s.end)).or_default().push(i);
    }

    let mut used = vec![false; segments.len()];
    let mut rings = Vec::new();

    let next_unused = |at: (f64, f64), used: &[bool]| -> Option<usize> {
        by_endpoint
            .get(&key(at))?
            .iter()
            .copied()
            .find(|&i| !used[i])
    };

    for start in 0..segments.len() {
        if used[start] {
            continue;
        }
        used[start] = true;
        let mut points = vec![segments[start].start, segments[start].end];
        let mut closed = false;

        // Walk forward from the tail.
        loop {
            let tail = *points.last().unwrap();
            let Some(i) = next_unused(tail, &used) else {
                break;
            };
            used[i] = true;
            let s = segments[i];
            let next = if key(s.start) == key(tail) { s.end } else { s.start };
            if key(next) == key(points[0]) {
                closed = true;
                break;
            }
            points.push(next);
        }

        // Open chain: extend backward from the head as well.
        if !closed {
            loop {
                let head = points[0];
                let Some(i) = next_unused(head, &used) else {
                    break;
                };
                used[i] = true;
                let s = segments[i];
                let prev = if key(s.start) == key(head) { s.end } else { s.start };
                points.insert(0, prev);
            }
        }

        if closed && signed_area(&points) < 0.0 {
            points.reverse();
        }
        rings.push(ContourRing { points, closed });
    }

    rings
}

/// Twice-signed shoelace area of a closed point loop (first point not
/// repeated at the end).
fn signed_area(points: &[(f64, f64)]) -> f64 {
    let n = points.len();
    let mut acc = 0.0;
    for i in 0..n {
        let (x0, y0) = points[i];
        let (x1, y1) = points[(i + 1) % n];
        acc += x0 * y1 - x1 * y0;
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from(values: &[f64], w: usize, h: usize) -> Grid<f64> {
        assert_eq!(values.len(), w * h);
        Grid {
            data: values.to_vec(),
            w,
            h,
        }
    }

    #[test]
    fn flat_field_has_no_contours() {
        let grid = grid_from(&[5.0; 9], 3, 3);
        let bands = extract_contours(&grid, &[5.0]);
        assert_eq!(bands.len(), 1);
        assert!(bands[0].rings.is_empty());
    }

    #[test]
    fn level_without_crossings_is_empty_not_an_error() {
        let grid = grid_from(&[1.0, 2.0, 3.0, 4.0], 2, 2);
        let bands = extract_contours(&grid, &[100.0]);
        assert!(bands[0].rings.is_empty());
    }

    #[test]
    fn peak_produces_single_closed_ring() {
        #[rustfmt::skip]
        let grid = grid_from(&[
            0.0, 0.0, 0.0,
            0.0, 10.0, 0.0,
            0.0, 0.0, 0.0,
        ], 3, 3);
        let bands = extract_contours(&grid, &[5.0]);
        assert_eq!(bands[0].rings.len(), 1);
        let ring = &bands[0].rings[0];
        assert!(ring.closed);
        assert_eq!(ring.points.len(), 4); // diamond around the peak
    }

    #[test]
    fn closed_rings_share_positive_winding() {
        #[rustfmt::skip]
        let grid = grid_from(&[
            0.0, 0.0, 0.0, 0.0, 0.0,
            0.0, 9.0, 9.0, 9.0, 0.0,
            0.0, 9.0, 0.5, 9.0, 0.0,
            0.0, 9.0, 9.0, 9.0, 0.0,
            0.0, 0.0, 0.0, 0.0, 0.0,
        ], 5, 5);
        // Outer boundary plus a hole around the depressed center.
        let bands = extract_contours(&grid, &[1.0, 5.0]);
        for band in &bands {
            assert!(!band.rings.is_empty());
            for ring in &band.rings {
                assert!(ring.closed);
                assert!(signed_area(&ring.points) > 0.0);
            }
        }
        // The 5.0 level has both the outer ring and the hole ring.
        assert_eq!(bands[1].rings.len(), 2);
    }

    #[test]
    fn edge_interpolation_is_subcell() {
        let grid = grid_from(&[0.0, 10.0, 0.0, 10.0], 2, 2);
        let bands = extract_contours(&grid, &[2.5]);
        let ring = &bands[0].rings[0];
        // Vertical crossing line at x = 0.25.
        for &(x, _) in &ring.points {
            assert!((x - 0.25).abs() < 1e-12);
        }
    }

    #[test]
    fn saddle_center_above_connects() {
        // tl and br above, center average (10+0+10+0)/4 = 5 >= 4.
        let grid = grid_from(&[10.0, 0.0, 0.0, 10.0], 2, 2);
        let bands = extract_contours(&grid, &[4.0]);
        let rings = &bands[0].rings;
        assert_eq!(rings.len(), 2);
        // Connected variant: one chain joins top to right, the other
        // left to bottom (no chain joins left to top).
        for ring in rings {
            let first = ring.points.first().unwrap();
            let last = ring.points.last().unwrap();
            let on_top = |p: &(f64, f64)| p.1 == 0.0;
            let on_left = |p: &(f64, f64)| p.0 == 0.0;
            assert!(!(on_top(first) && on_left(last) || on_left(first) && on_top(last)));
        }
    }

    #[test]
    fn saddle_center_below_separates() {
        // Same corners, higher level: center average 5 < 8.
        let grid = grid_from(&[10.0, 0.0, 0.0, 10.0], 2, 2);
        let bands = extract_contours(&grid, &[8.0]);
        let rings = &bands[0].rings;
        assert_eq!(rings.len(), 2);
        // Disconnected variant: one chain joins left to top (around
        // tl), the other right to bottom (around br).
        let mut saw_tl_corner = false;
        for ring in rings {
            let first = ring.points.first().unwrap();
            let last = ring.points.last().unwrap();
            let on_top = |p: &(f64, f64)| p.1 == 0.0;
            let on_left = |p: &(f64, f64)| p.0 == 0.0;
            if on_top(first) && on_left(last) || on_left(first) && on_top(last) {
                saw_tl_corner = true;
            }
        }
        assert!(saw_tl_corner);
    }

    #[test]
    fn no_ring_touches_cells_around_a_nan_sample() {
        // Radial bowl with a hole poked at the center node (5, 5).
        let n = 11usize;
        let mut grid = Grid::new(n, n);
        for y in 0..n {
            for x in 0..n {
                let dx = x as f64 - 5.0;
                let dy = y as f64 - 5.0;
                grid.set(x, y, (dx * dx + dy * dy).sqrt());
            }
        }
        grid.set(5, 5, f64::NAN);

        let levels: Vec<f64> = (1..=9).map(|k| k as f64 * 0.5).collect();
        let bands = extract_contours(&grid, &levels);
        let mut total_points = 0usize;
        for band in &bands {
            for ring in &band.rings {
                for &(x, y) in &ring.points {
                    // Every cell incident to the NaN node is excluded,
                    // so nothing may land strictly inside its 2×2
                    // neighborhood.
                    assert!(
                        (x - 5.0).abs() >= 1.0 - 1e-9 || (y - 5.0).abs() >= 1.0 - 1e-9,
                        "ring point ({x}, {y}) inside excluded cells"
                    );
                    total_points += 1;
                }
            }
        }
        assert!(total_points > 0);
    }

    #[test]
    fn bands_come_back_in_ascending_level_order() {
        let grid = grid_from(&[0.0, 1.0, 2.0, 3.0], 2, 2);
        let levels = [0.5, 1.5, 2.5];
        let bands = extract_contours(&grid, &levels);
        let out: Vec<f64> = bands.iter().map(|b| b.level).collect();
        assert_eq!(out, levels);
    }
}
