use hashbrown::HashMap;
use strata_blocks::Block;
use strata_world::{
    BLOCKS_PER_LAYER, CHUNK_MASK_X, CHUNK_MASK_Y, CHUNK_MAX_X, CHUNK_MAX_Y, CHUNK_MAX_Z,
    CHUNK_SIZE_X, ChunkCoord, Direction, Face, chunk_coord_for_block, local_xy_for_block,
    try_pack_local,
};

use crate::chunk::Chunk;
use crate::iter::BlockIter;

const Y_FIELD: usize = CHUNK_MASK_Y * CHUNK_SIZE_X;

/// The active chunks, keyed by coordinate, with symmetric neighbor links.
#[derive(Debug, Default)]
pub struct ChunkMap {
    chunks: HashMap<ChunkCoord, Chunk>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[inline]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    #[inline]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    #[inline]
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChunkCoord, &Chunk)> {
        self.chunks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ChunkCoord, &mut Chunk)> {
        self.chunks.iter_mut()
    }

    pub fn coords(&self) -> Vec<ChunkCoord> {
        self.chunks.keys().copied().collect()
    }

    /// Inserts a chunk and links it with every present cardinal neighbor.
    /// Newly linked neighbors are marked mesh-dirty since their border faces
    /// can now see into this chunk. Returns `false` (and drops nothing) if the
    /// coordinate is already active.
    pub fn insert_linked(&mut self, mut chunk: Chunk) -> bool {
        let coord = chunk.coord();
        if self.chunks.contains_key(&coord) {
            return false;
        }
        for dir in Direction::ALL {
            let ncoord = coord.neighbor(dir);
            if let Some(n) = self.chunks.get_mut(&ncoord) {
                n.neighbors[dir.opposite().index()] = Some(coord);
                n.mark_mesh_dirty();
                chunk.neighbors[dir.index()] = Some(ncoord);
            } else {
                chunk.neighbors[dir.index()] = None;
            }
        }
        self.chunks.insert(coord, chunk);
        true
    }

    /// Removes a chunk and clears the links on both sides.
    pub fn remove_unlinked(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        let mut chunk = self.chunks.remove(&coord)?;
        for dir in Direction::ALL {
            if let Some(ncoord) = chunk.neighbors[dir.index()].take() {
                if let Some(n) = self.chunks.get_mut(&ncoord) {
                    n.neighbors[dir.opposite().index()] = None;
                }
            }
        }
        Some(chunk)
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Chunk> + '_ {
        self.chunks.drain().map(|(_, mut c)| {
            c.neighbors = [None; 4];
            c
        })
    }

    #[inline]
    pub fn neighbor(&self, coord: ChunkCoord, dir: Direction) -> Option<ChunkCoord> {
        self.chunks.get(&coord)?.neighbor(dir)
    }

    #[inline]
    pub fn has_all_neighbors(&self, coord: ChunkCoord) -> bool {
        self.chunks.get(&coord).is_some_and(Chunk::has_all_neighbors)
    }

    pub fn mark_mesh_dirty(&mut self, coord: ChunkCoord) {
        if let Some(c) = self.chunks.get_mut(&coord) {
            c.mark_mesh_dirty();
        }
    }

    #[inline]
    pub fn block(&self, it: BlockIter) -> Option<Block> {
        self.chunks.get(&it.coord).map(|c| c.block(it.index))
    }

    #[inline]
    pub fn block_mut(&mut self, it: BlockIter) -> Option<&mut Block> {
        self.chunks.get_mut(&it.coord).map(|c| c.block_mut(it.index))
    }

    /// Iterator for the block at global coordinates, if its chunk is active.
    pub fn iter_at(&self, gx: i32, gy: i32, gz: i32) -> Option<BlockIter> {
        let coord = chunk_coord_for_block(gx, gy);
        if !self.chunks.contains_key(&coord) {
            return None;
        }
        let (lx, ly) = local_xy_for_block(gx, gy);
        let index = try_pack_local(lx as i32, ly as i32, gz)?;
        Some(BlockIter::new(coord, index))
    }

    /// Steps one block across `face`.
    ///
    /// Lateral steps off a chunk edge follow the neighbor link and yield
    /// `None` when no neighbor is linked. The column is closed at the top and
    /// bottom: stepping up from z = 127 or down from z = 0 yields `None`.
    pub fn step(&self, it: BlockIter, face: Face) -> Option<BlockIter> {
        let (x, y, z) = it.local();
        let i = it.index;
        let cross = |dir: Direction, index: usize| {
            self.neighbor(it.coord, dir).map(|n| BlockIter::new(n, index))
        };
        match face {
            Face::East if x < CHUNK_MAX_X => Some(BlockIter::new(it.coord, i + 1)),
            Face::East => cross(Direction::East, i & !CHUNK_MASK_X),
            Face::West if x > 0 => Some(BlockIter::new(it.coord, i - 1)),
            Face::West => cross(Direction::West, i | CHUNK_MASK_X),
            Face::North if y < CHUNK_MAX_Y => Some(BlockIter::new(it.coord, i + CHUNK_SIZE_X)),
            Face::North => cross(Direction::North, i & !Y_FIELD),
            Face::South if y > 0 => Some(BlockIter::new(it.coord, i - CHUNK_SIZE_X)),
            Face::South => cross(Direction::South, i | Y_FIELD),
            Face::Up if z < CHUNK_MAX_Z => Some(BlockIter::new(it.coord, i + BLOCKS_PER_LAYER)),
            Face::Down if z > 0 => Some(BlockIter::new(it.coord, i - BLOCKS_PER_LAYER)),
            Face::Up | Face::Down => None,
        }
    }

    /// Checks that every link points at an active chunk that links back.
    pub fn links_are_symmetric(&self) -> bool {
        self.chunks.iter().all(|(coord, chunk)| {
            Direction::ALL.iter().all(|&dir| {
                let expected = self.chunks.contains_key(&coord.neighbor(dir));
                match chunk.neighbor(dir) {
                    Some(n) => {
                        expected
                            && n == coord.neighbor(dir)
                            && self.neighbor(n, dir.opposite()) == Some(*coord)
                    }
                    None => !expected,
                }
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_world::{CHUNK_SIZE_Z, pack_local};

    fn chunk(cx: i32, cy: i32) -> Chunk {
        Chunk::filled(ChunkCoord::new(cx, cy), Block::AIR)
    }

    #[test]
    fn lone_chunk_has_no_neighbors_until_one_arrives() {
        let mut map = ChunkMap::new();
        assert!(map.insert_linked(chunk(0, 0)));
        let origin = ChunkCoord::new(0, 0);
        for dir in Direction::ALL {
            assert_eq!(map.neighbor(origin, dir), None);
        }
        map.get_mut(origin).unwrap().set_mesh(Default::default());
        assert!(map.insert_linked(chunk(1, 0)));
        assert_eq!(map.neighbor(origin, Direction::East), Some(ChunkCoord::new(1, 0)));
        assert_eq!(map.neighbor(ChunkCoord::new(1, 0), Direction::West), Some(origin));
        assert!(map.get(origin).unwrap().is_mesh_dirty());
        assert!(map.links_are_symmetric());
    }

    #[test]
    fn duplicate_insert_is_refused() {
        let mut map = ChunkMap::new();
        assert!(map.insert_linked(chunk(0, 0)));
        assert!(!map.insert_linked(chunk(0, 0)));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn removal_clears_both_sides() {
        let mut map = ChunkMap::new();
        for (x, y) in [(0, 0), (1, 0), (0, 1), (-1, 0), (0, -1)] {
            map.insert_linked(chunk(x, y));
        }
        assert!(map.has_all_neighbors(ChunkCoord::new(0, 0)));
        let removed = map.remove_unlinked(ChunkCoord::new(0, 0)).unwrap();
        assert!(Direction::ALL.iter().all(|d| removed.neighbor(*d).is_none()));
        assert_eq!(map.neighbor(ChunkCoord::new(1, 0), Direction::West), None);
        assert!(map.links_are_symmetric());
    }

    #[test]
    fn stepping_crosses_linked_edges_and_stops_at_column_ends() {
        let mut map = ChunkMap::new();
        map.insert_linked(chunk(0, 0));
        let origin = ChunkCoord::new(0, 0);
        let east_edge = BlockIter::new(origin, pack_local(15, 7, 3));
        assert_eq!(map.step(east_edge, Face::East), None);
        map.insert_linked(chunk(1, 0));
        assert_eq!(
            map.step(east_edge, Face::East),
            Some(BlockIter::new(ChunkCoord::new(1, 0), pack_local(0, 7, 3)))
        );

        map.insert_linked(chunk(0, -1));
        let south_edge = BlockIter::new(origin, pack_local(4, 0, 9));
        assert_eq!(
            map.step(south_edge, Face::South),
            Some(BlockIter::new(ChunkCoord::new(0, -1), pack_local(4, 15, 9)))
        );

        let top = BlockIter::new(origin, pack_local(4, 4, CHUNK_SIZE_Z - 1));
        let bottom = BlockIter::new(origin, pack_local(4, 4, 0));
        assert_eq!(map.step(top, Face::Up), None);
        assert_eq!(map.step(bottom, Face::Down), None);
        assert_eq!(
            map.step(bottom, Face::Up),
            Some(BlockIter::new(origin, pack_local(4, 4, 1)))
        );
    }

    #[test]
    fn iter_at_handles_negative_coordinates() {
        let mut map = ChunkMap::new();
        map.insert_linked(chunk(-1, -1));
        let it = map.iter_at(-1, -16, 5).unwrap();
        assert_eq!(it.coord, ChunkCoord::new(-1, -1));
        assert_eq!(it.local(), (15, 0, 5));
        assert_eq!(it.world_pos(), (-1, -16, 5));
        assert!(map.iter_at(0, 0, 5).is_none());
        assert!(map.iter_at(-1, -1, 128).is_none());
    }
}
