//! Child positions within a parent quad and the four edge directions.

/// Where a child sits inside its parent.
///
/// Root nodes have no position; callers model that as `Option<QuadPosition>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum QuadPosition {
    NorthWest = 0,
    SouthWest = 1,
    SouthEast = 2,
    NorthEast = 3,
}

/// One of a quad's four neighbour directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum QuadEdge {
    North = 0,
    West = 1,
    South = 2,
    East = 3,
}

impl QuadPosition {
    /// All four children in storage order.
    pub const ALL: [QuadPosition; 4] = [
        QuadPosition::NorthWest,
        QuadPosition::SouthWest,
        QuadPosition::SouthEast,
        QuadPosition::NorthEast,
    ];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The two edges of this child that lie on the parent's border, in the
    /// order they are relinked.
    #[must_use]
    pub fn outer_edges(self) -> [QuadEdge; 2] {
        match self {
            QuadPosition::NorthWest => [QuadEdge::North, QuadEdge::West],
            QuadPosition::SouthWest => [QuadEdge::West, QuadEdge::South],
            QuadPosition::SouthEast => [QuadEdge::South, QuadEdge::East],
            QuadPosition::NorthEast => [QuadEdge::East, QuadEdge::North],
        }
    }

    /// Whether `edge` of this child lies on the parent's border.
    #[must_use]
    pub fn is_outer_edge(self, edge: QuadEdge) -> bool {
        self.outer_edges().contains(&edge)
    }
}

impl QuadEdge {
    /// All four edges in storage order.
    pub const ALL: [QuadEdge; 4] = [
        QuadEdge::North,
        QuadEdge::West,
        QuadEdge::South,
        QuadEdge::East,
    ];

    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The opposite edge. North/South and West/East pair up.
    #[must_use]
    pub fn complement(self) -> QuadEdge {
        match self {
            QuadEdge::North => QuadEdge::South,
            QuadEdge::West => QuadEdge::East,
            QuadEdge::South => QuadEdge::North,
            QuadEdge::East => QuadEdge::West,
        }
    }

    /// The two children of a quad that touch this edge.
    #[must_use]
    pub fn children(self) -> [QuadPosition; 2] {
        match self {
            QuadEdge::North => [QuadPosition::NorthWest, QuadPosition::NorthEast],
            QuadEdge::West => [QuadPosition::NorthWest, QuadPosition::SouthWest],
            QuadEdge::South => [QuadPosition::SouthWest, QuadPosition::SouthEast],
            QuadEdge::East => [QuadPosition::SouthEast, QuadPosition::NorthEast],
        }
    }
}
