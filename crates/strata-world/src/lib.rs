//! Column addressing, world configuration, and deterministic terrain generation.
#![forbid(unsafe_code)]

pub mod generation;
pub mod noise;
pub mod voxel;
pub mod worldgen;

pub use generation::{ColumnClimate, Generator, Palette};
pub use voxel::{
    BLOCKS_PER_CHUNK, BLOCKS_PER_LAYER, CHUNK_BITS_X, CHUNK_BITS_Y, CHUNK_BITS_Z, CHUNK_MASK_X,
    CHUNK_MASK_Y, CHUNK_MASK_Z, CHUNK_MAX_X, CHUNK_MAX_Y, CHUNK_MAX_Z, CHUNK_SIZE_X, CHUNK_SIZE_Y,
    CHUNK_SIZE_Z, ChunkCoord, Direction, Face, SEA_LEVEL, chunk_coord_for_block,
    chunk_coord_for_world, local_xy_for_block, pack_local, try_pack_local, unpack_local,
};
pub use worldgen::{GenerationMode, WorldConfig};
