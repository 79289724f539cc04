//! Streaming voxel world: chunk lifecycle around a viewpoint, incremental
//! lighting, edits, persistence and CPU meshing, built on the `strata-*`
//! crates.
#![forbid(unsafe_code)]

pub mod raycast;
pub mod sky;
pub mod world;

pub use raycast::{RayHit, raycast};
pub use sky::{DayCycle, SkySample};
pub use world::{StepReport, World, WorldError};

pub use strata_blocks::{Block, BlockId, BlockRegistry, TemplateRegistry};
pub use strata_chunk::{BlockIter, ChunkMap, ChunkMesh, ChunkState};
pub use strata_geom::Vec3;
pub use strata_world::{ChunkCoord, Face, GenerationMode, WorldConfig};
