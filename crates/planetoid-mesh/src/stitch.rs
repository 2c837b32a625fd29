//! Index generation for a square vertex grid with crack-free borders.
//!
//! The grid is `side × side` vertices, index `x + y * side`, with `y = 0`
//! the north row and `x = 0` the west column. Cells along an edge whose
//! neighbour is coarser are left out of the regular grid and replaced by a
//! stitch that only touches every `2^lo`-th vertex on that edge, matching
//! the neighbour's vertices exactly.

use planetoid_cubesphere::QuadEdge;

use crate::PatchLod;

/// Worst-case index count for a grid of `side × side` vertices.
pub fn max_index_count(side: u32) -> usize {
    6 * (side as usize) * (side as usize)
}

/// Writes the triangle list for `lod` into `out`, replacing its contents.
pub fn patch_indices(lod: &PatchLod, side: u32, out: &mut Vec<u32>) {
    assert!(side >= 2, "a patch needs at least 2x2 vertices");
    out.clear();

    let [north, west, south, east] = QuadEdge::ALL.map(|e| lod.is_coarser(e));
    let inset = u32::from;
    let last = side - 1;

    for y in inset(north)..last - inset(south) {
        for x in inset(west)..last - inset(east) {
            let i = x + y * side;
            out.extend_from_slice(&[i, i + side, i + 1]);
            out.extend_from_slice(&[i + side, i + side + 1, i + 1]);
        }
    }

    // A neighbour more levels down than the grid can resolve is stitched
    // across the whole edge at once.
    let max_levels = last.trailing_zeros();
    let stitches = [
        (QuadEdge::North, north, west, east),
        (QuadEdge::East, east, north, south),
        (QuadEdge::South, south, east, west),
        (QuadEdge::West, west, south, north),
    ];
    for (edge, coarser, omit_first, omit_last) in stitches {
        if coarser {
            let lo = lod.levels_down(edge).min(max_levels);
            stitch_edge(edge, 0, lo, omit_first, omit_last, side, out);
        }
    }
}

/// Fans the fine vertices one row in from `edge` onto the coarse vertices
/// on the edge itself.
///
/// Fine vertices are `2^hi` apart, coarse ones `2^lo`. For every coarse pair
/// this emits a fan from the first coarse vertex over the first half of the
/// fine span, one triangle joining both coarse vertices to the fine
/// midpoint, and a fan from the second coarse vertex over the rest.
/// `omit_first`/`omit_last` drop the triangle at each corner when the
/// perpendicular edge is stitched too and already covers it.
pub fn stitch_edge(
    edge: QuadEdge,
    hi: u32,
    lo: u32,
    omit_first: bool,
    omit_last: bool,
    side: u32,
    out: &mut Vec<u32>,
) {
    assert!(lo > hi, "stitching needs a coarser neighbour");
    let last = i64::from(side) - 1;
    let fine = 1i64 << hi;
    let coarse = 1i64 << lo;
    assert!(coarse <= last, "neighbour spacing exceeds the grid");

    // (first along, last along, row of the edge, inward offset, along x, reversed)
    let (start, end, row, inward, horizontal, reversed) = match edge {
        QuadEdge::North => (0, last, 0, fine, true, false),
        QuadEdge::West => (last, 0, 0, fine, false, true),
        QuadEdge::South => (last, 0, last, -fine, true, true),
        QuadEdge::East => (0, last, last, -fine, false, false),
    };
    let sign = if reversed { -1 } else { 1 };
    let step = fine * sign;
    let span = coarse * sign;
    let half = span / 2;

    let vertex = |along: i64, across: i64| -> u32 {
        let (x, y) = if horizontal {
            (along, across)
        } else {
            (across, along)
        };
        (x + y * i64::from(side)) as u32
    };
    let inner = row + inward;

    let mut j = start;
    while j != end {
        let mut k = 0;
        while k != half {
            if !(omit_first && j == start && k == 0) {
                out.extend_from_slice(&[
                    vertex(j, row),
                    vertex(j + k, inner),
                    vertex(j + k + step, inner),
                ]);
            }
            k += step;
        }

        out.extend_from_slice(&[vertex(j, row), vertex(j + half, inner), vertex(j + span, row)]);

        let mut k = half;
        while k != span {
            if !(omit_last && j == end - span && k == span - step) {
                out.extend_from_slice(&[
                    vertex(j + span, row),
                    vertex(j + k, inner),
                    vertex(j + k + step, inner),
                ]);
            }
            k += step;
        }
        j += span;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_xy(index: u32, side: u32) -> (f64, f64) {
        (f64::from(index % side), f64::from(index / side))
    }

    /// Signed area of each triangle in grid units.
    fn signed_areas(indices: &[u32], side: u32) -> Vec<f64> {
        indices
            .chunks_exact(3)
            .map(|t| {
                let (ax, ay) = grid_xy(t[0], side);
                let (bx, by) = grid_xy(t[1], side);
                let (cx, cy) = grid_xy(t[2], side);
                ((bx - ax) * (cy - ay) - (by - ay) * (cx - ax)) / 2.0
            })
            .collect()
    }

    #[test]
    fn test_uniform_lod_is_plain_grid() {
        let mut out = Vec::new();
        patch_indices(&PatchLod::uniform(3), 17, &mut out);
        assert_eq!(out.len(), 16 * 16 * 6);
        assert!(out.len() <= max_index_count(17));
    }

    #[test]
    fn test_one_stitched_edge_triangle_count() {
        // 4 segments per side, own LOD 1 against a LOD 0 north neighbour.
        let side = 5;
        let lod = PatchLod::uniform(1).with_neighbour(QuadEdge::North, 0);

        let mut stitch = Vec::new();
        stitch_edge(QuadEdge::North, 0, 1, false, false, side, &mut stitch);
        assert_eq!(stitch.len() / 3, 3 * (4 / 2), "three triangles per coarse pair");

        let mut all = Vec::new();
        patch_indices(&lod, side, &mut all);
        let interior = 4 * 3 * 2;
        assert_eq!(all.len() / 3, interior + 6);
    }

    #[test]
    fn test_every_neighbour_combination_is_crack_free() {
        let side = 17;
        let own = 3;
        let levels = [0, 1, 2, 3];
        for n in levels {
            for w in levels {
                for s in levels {
                    for e in levels {
                        let lod = PatchLod {
                            level: own,
                            neighbours: [n, w, s, e],
                        };
                        let mut out = Vec::new();
                        patch_indices(&lod, side, &mut out);
                        let areas = signed_areas(&out, side);

                        let total: f64 = areas.iter().map(|a| a.abs()).sum();
                        assert_eq!(total, 256.0, "{lod:?} does not cover the patch exactly");
                        let negative = areas.iter().filter(|a| **a < 0.0).count();
                        assert!(
                            negative == 0 || negative == areas.len(),
                            "{lod:?} has mixed winding"
                        );
                        assert!(areas.iter().all(|a| *a != 0.0), "{lod:?} emits degenerate triangles");
                    }
                }
            }
        }
    }

    #[test]
    fn test_stitched_edges_only_touch_coarse_vertices() {
        let side = 17;
        let lod = PatchLod {
            level: 3,
            neighbours: [1, 2, 3, 0],
        };
        let mut out = Vec::new();
        patch_indices(&lod, side, &mut out);

        for &i in &out {
            let (x, y) = (i % side, i / side);
            if y == 0 {
                assert_eq!(x % 4, 0, "north edge uses fine vertex ({x}, {y})");
            }
            if x == 0 {
                assert_eq!(y % 2, 0, "west edge uses fine vertex ({x}, {y})");
            }
            if x == side - 1 {
                assert_eq!(y % 8, 0, "east edge uses fine vertex ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_stitch_depth_is_clamped_to_grid() {
        let side = 5;
        let lod = PatchLod::uniform(9).with_neighbour(QuadEdge::South, 0);
        let mut out = Vec::new();
        patch_indices(&lod, side, &mut out);
        let total: f64 = signed_areas(&out, side).iter().map(|a| a.abs()).sum();
        assert_eq!(total, 16.0);
    }

    #[test]
    #[should_panic]
    fn test_stitch_without_coarser_neighbour_panics() {
        stitch_edge(QuadEdge::North, 1, 1, false, false, 5, &mut Vec::new());
    }
}
