//! LOD context of a patch: its own level and the effective level of each
//! edge neighbour.

use planetoid_cubesphere::QuadEdge;

/// Bits reserved per level in a packed signature.
pub const LOD_BITS: u32 = 6;

/// Largest level that fits in [`LOD_BITS`].
pub const MAX_LOD: u32 = (1 << LOD_BITS) - 1;

/// Own LOD plus the LOD each neighbour is rendered at, indexed by
/// [`QuadEdge::index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PatchLod {
    pub level: u32,
    pub neighbours: [u32; 4],
}

impl PatchLod {
    /// All neighbours at the same level: no stitching.
    pub fn uniform(level: u32) -> Self {
        Self {
            level,
            neighbours: [level; 4],
        }
    }

    /// Sets one neighbour's level.
    #[must_use]
    pub fn with_neighbour(mut self, edge: QuadEdge, level: u32) -> Self {
        self.neighbours[edge.index()] = level;
        self
    }

    pub fn neighbour(&self, edge: QuadEdge) -> u32 {
        self.neighbours[edge.index()]
    }

    /// Whether the neighbour across `edge` is coarser and needs a stitch.
    pub fn is_coarser(&self, edge: QuadEdge) -> bool {
        self.neighbour(edge) < self.level
    }

    /// How many levels coarser the neighbour across `edge` is.
    pub fn levels_down(&self, edge: QuadEdge) -> u32 {
        self.level.saturating_sub(self.neighbour(edge))
    }

    /// Packs own level then N, W, S, E into consecutive [`LOD_BITS`] fields.
    pub fn signature(&self) -> u32 {
        debug_assert!(self.level <= MAX_LOD, "level {} overflows", self.level);
        let mut packed = self.level & MAX_LOD;
        for (i, n) in self.neighbours.iter().enumerate() {
            packed |= (n & MAX_LOD) << (LOD_BITS * (i as u32 + 1));
        }
        packed
    }
}
