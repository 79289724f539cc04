mod chunk_coord;
mod face;
mod layout;

pub use chunk_coord::{ChunkCoord, chunk_coord_for_block, chunk_coord_for_world, local_xy_for_block};
pub use face::{Direction, Face};
pub use layout::{
    BLOCKS_PER_CHUNK, BLOCKS_PER_LAYER, CHUNK_BITS_X, CHUNK_BITS_Y, CHUNK_BITS_Z, CHUNK_MASK_X,
    CHUNK_MASK_Y, CHUNK_MASK_Z, CHUNK_MAX_X, CHUNK_MAX_Y, CHUNK_MAX_Z, CHUNK_SIZE_X, CHUNK_SIZE_Y,
    CHUNK_SIZE_Z, SEA_LEVEL, pack_local, try_pack_local, unpack_local,
};
