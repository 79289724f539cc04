use strata_world::{CHUNK_SIZE_X, CHUNK_SIZE_Y, ChunkCoord, unpack_local};

/// Copyable handle to one block: the owning chunk's coordinate and the packed
/// index inside it. Stepping across chunk edges goes through
/// [`ChunkMap::step`](crate::ChunkMap::step).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockIter {
    pub coord: ChunkCoord,
    pub index: usize,
}

impl BlockIter {
    #[inline]
    pub const fn new(coord: ChunkCoord, index: usize) -> Self {
        Self { coord, index }
    }

    #[inline]
    pub fn local(self) -> (usize, usize, usize) {
        unpack_local(self.index)
    }

    /// Global block coordinates.
    pub fn world_pos(self) -> (i32, i32, i32) {
        let (x, y, z) = self.local();
        let (x0, y0) = self.coord.origin();
        (x0 + x as i32, y0 + y as i32, z as i32)
    }

    #[inline]
    pub fn is_on_lateral_edge(self) -> bool {
        let (x, y, _) = self.local();
        x == 0 || y == 0 || x == CHUNK_SIZE_X - 1 || y == CHUNK_SIZE_Y - 1
    }
}
