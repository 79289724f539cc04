use std::sync::Arc;

use strata_blocks::{Block, BlockId};
use strata_geom::Aabb;
use strata_world::{BLOCKS_PER_CHUNK, CHUNK_SIZE_Z, ChunkCoord, Direction, pack_local, try_pack_local};

use crate::mesh::ChunkMesh;

/// One 16x16x128 column of blocks plus its streaming bookkeeping.
///
/// Neighbor links are coordinates of linked active chunks. They are only
/// written by [`ChunkMap`](crate::ChunkMap), which keeps them symmetric.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    bounds: Aabb,
    blocks: Box<[Block]>,
    pub(crate) neighbors: [Option<ChunkCoord>; 4],
    mesh_dirty: bool,
    needs_saving: bool,
    mesh: Option<Arc<ChunkMesh>>,
    upload_pending: bool,
}

impl Chunk {
    /// Wraps generated or loaded blocks. The slice must hold exactly one column.
    pub fn new(coord: ChunkCoord, blocks: Box<[Block]>) -> Self {
        debug_assert_eq!(blocks.len(), BLOCKS_PER_CHUNK);
        Self {
            coord,
            bounds: coord.bounds(),
            blocks,
            neighbors: [None; 4],
            mesh_dirty: true,
            needs_saving: false,
            mesh: None,
            upload_pending: false,
        }
    }

    pub fn filled(coord: ChunkCoord, block: Block) -> Self {
        Self::new(coord, vec![block; BLOCKS_PER_CHUNK].into_boxed_slice())
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    #[inline]
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    #[inline]
    pub fn blocks_mut(&mut self) -> &mut [Block] {
        &mut self.blocks
    }

    pub fn into_blocks(self) -> Box<[Block]> {
        self.blocks
    }

    #[inline]
    pub fn block(&self, index: usize) -> Block {
        self.blocks[index]
    }

    #[inline]
    pub fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    pub fn get_local(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        try_pack_local(x, y, z).map(|i| self.blocks[i])
    }

    /// Writes a type id without touching light, flags, or dirty state.
    pub fn set_type_local(&mut self, x: i32, y: i32, z: i32, id: BlockId) -> bool {
        match try_pack_local(x, y, z) {
            Some(i) => {
                self.blocks[i].id = id;
                true
            }
            None => false,
        }
    }

    /// Highest z in the column `(x, y)` whose block is not air.
    pub fn highest_non_air(&self, x: usize, y: usize) -> Option<usize> {
        (0..CHUNK_SIZE_Z)
            .rev()
            .find(|&z| self.blocks[pack_local(x, y, z)].id != strata_blocks::AIR_ID)
    }

    #[inline]
    pub fn neighbor(&self, dir: Direction) -> Option<ChunkCoord> {
        self.neighbors[dir.index()]
    }

    #[inline]
    pub fn has_all_neighbors(&self) -> bool {
        self.neighbors.iter().all(Option::is_some)
    }

    #[inline]
    pub fn is_mesh_dirty(&self) -> bool {
        self.mesh_dirty
    }

    #[inline]
    pub fn mark_mesh_dirty(&mut self) {
        self.mesh_dirty = true;
    }

    #[inline]
    pub fn needs_saving(&self) -> bool {
        self.needs_saving
    }

    #[inline]
    pub fn mark_needs_saving(&mut self) {
        self.needs_saving = true;
    }

    #[inline]
    pub fn clear_needs_saving(&mut self) {
        self.needs_saving = false;
    }

    pub fn mesh(&self) -> Option<&Arc<ChunkMesh>> {
        self.mesh.as_ref()
    }

    /// Stores a freshly built mesh, clears the dirty flag, and flags it for upload.
    pub fn set_mesh(&mut self, mesh: ChunkMesh) {
        self.mesh = Some(Arc::new(mesh));
        self.mesh_dirty = false;
        self.upload_pending = true;
    }

    /// The mesh the renderer has not picked up yet, if any.
    pub fn take_upload(&mut self) -> Option<Arc<ChunkMesh>> {
        if !self.upload_pending {
            return None;
        }
        self.upload_pending = false;
        self.mesh.clone()
    }
}
