//! Block definitions, the per-voxel block value, and the template catalog.
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod registry;
pub mod template;
pub mod types;

pub use error::RegistryError;
pub use registry::{BlockDef, BlockRegistry};
pub use template::{BlockTemplate, TemplateEntry, TemplateRegistry};
pub use types::{AIR_ID, Block, BlockId, FaceRole, SpriteCoords};
