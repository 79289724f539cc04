//! CPU meshing crate: one textured, light-tinted quad per visible block face.
#![forbid(unsafe_code)]

mod build;
mod emit;

pub use build::{MeshOptions, build_chunk_mesh, face_color, face_corners};
pub use emit::MeshBuild;
