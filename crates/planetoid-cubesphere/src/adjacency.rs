//! Neighbour resolution tables for quadtree children.
//!
//! A child's neighbour across an edge is a child of its parent's neighbour
//! across the same edge. Inside one cube face the answer only depends on the
//! child position ([`local_neighbour`]). When the edge crosses onto another
//! face the two faces' local axes are rotated against each other, so each
//! face carries its own override table ([`cube_neighbour`]).

use crate::{CubeFace, QuadEdge, QuadPosition};

use crate::CubeFace::{Back as BK, Down as DN, Front as FR, Left as LF, Right as RT, Up as UP};
use crate::QuadPosition::{NorthEast as NE, NorthWest as NW, SouthEast as SE, SouthWest as SW};

/// `[position][edge]` → position within the neighbouring parent, same face.
const LOCAL_MAP: [[QuadPosition; 4]; 4] = [
    // N   W   S   E
    [SW, NE, SW, NE], // NW
    [NW, SE, NW, SE], // SW
    [NE, SW, NE, SW], // SE
    [SE, NW, SE, NW], // NE
];

/// `[face][position][edge]` → position within the neighbouring parent when
/// the edge crosses onto another face. Entries for edges that stay inside
/// the parent repeat the local map.
const CUBE_MAP: [[[QuadPosition; 4]; 4]; 6] = [
    // Front
    [
        [SW, NE, SW, NE],
        [NW, SE, NW, SE],
        [NE, SW, NE, SW],
        [SE, NW, SE, NW],
    ],
    // Back
    [
        [SW, SW, SW, NE],
        [NW, NW, NW, SE],
        [NE, SW, NE, NE],
        [SE, NW, SE, SE],
    ],
    // Left
    [
        [NW, SW, SW, NE],
        [NW, NW, SW, SE],
        [NE, SW, NW, SW],
        [SW, NW, SE, NW],
    ],
    // Right
    [
        [SE, NE, SW, NE],
        [NW, SE, NE, SE],
        [NE, SW, SE, NE],
        [NE, NW, SE, SE],
    ],
    // Up
    [
        [SW, NW, SW, NE],
        [NW, NE, NW, SE],
        [NE, SW, NE, NW],
        [SE, NW, SE, NE],
    ],
    // Down
    [
        [SW, SE, SW, NE],
        [NW, SW, NW, SE],
        [NE, SW, NE, SE],
        [SE, NW, SE, SW],
    ],
];

/// `[face][edge]` → the face across that edge of a face root.
const ROOT_NEIGHBOURS: [[CubeFace; 4]; 6] = [
    // N   W   S   E
    [UP, LF, DN, RT], // Front
    [DN, LF, UP, RT], // Back
    [UP, BK, DN, FR], // Left
    [UP, FR, DN, BK], // Right
    [BK, LF, FR, RT], // Up
    [FR, LF, BK, RT], // Down
];

/// Neighbouring child position when both parents lie on the same face.
#[inline]
#[must_use]
pub fn local_neighbour(position: QuadPosition, edge: QuadEdge) -> QuadPosition {
    LOCAL_MAP[position.index()][edge.index()]
}

/// Neighbouring child position when `edge` leaves `face`.
#[inline]
#[must_use]
pub fn cube_neighbour(face: CubeFace, position: QuadPosition, edge: QuadEdge) -> QuadPosition {
    CUBE_MAP[face.index()][position.index()][edge.index()]
}

/// The face adjoining `face` across one of its root edges.
#[inline]
#[must_use]
pub fn root_neighbour(face: CubeFace, edge: QuadEdge) -> CubeFace {
    ROOT_NEIGHBOURS[face.index()][edge.index()]
}

/// Picks the child of the parent's `edge` neighbour that borders a child at
/// `position` on `face`.
///
/// `across` is the face of the parent's neighbour on that edge. The cube
/// table applies only when the edge is on the parent's border and that
/// neighbour lies on a different face.
#[must_use]
pub fn resolve(
    face: CubeFace,
    position: QuadPosition,
    edge: QuadEdge,
    across: CubeFace,
) -> QuadPosition {
    if position.is_outer_edge(edge) && across != face {
        cube_neighbour(face, position, edge)
    } else {
        local_neighbour(position, edge)
    }
}
