//! Chunk storage, the active chunk map with its neighbor graph, and block iterators.
#![forbid(unsafe_code)]

mod chunk;
mod iter;
mod map;
mod mesh;
mod state;

pub use chunk::Chunk;
pub use iter::BlockIter;
pub use map::ChunkMap;
pub use mesh::{ChunkMesh, Vertex};
pub use state::{ChunkState, InitializingChunks};
