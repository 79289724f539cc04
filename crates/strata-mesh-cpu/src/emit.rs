use strata_chunk::{ChunkMesh, Vertex};
use strata_geom::Vec3;

/// Triangle-list accumulator for one chunk.
#[derive(Default, Clone, Debug)]
pub struct MeshBuild {
    vertices: Vec<Vertex>,
}

impl MeshBuild {
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(quads * 6),
        }
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 6
    }

    /// Adds a quad given counter-clockwise corners `[bl, br, tr, tl]` as seen
    /// from outside, split into `(bl, br, tr)` and `(bl, tr, tl)`.
    ///
    /// `uv` is `[u0, v0, u1, v1]`; the bottom edge samples `v1`.
    pub fn add_quad(&mut self, corners: [Vec3; 4], uv: [f32; 4], color: [u8; 4]) {
        let [u0, v0, u1, v1] = uv;
        let uvs = [[u0, v1], [u1, v1], [u1, v0], [u0, v0]];
        for i in [0, 1, 2, 0, 2, 3] {
            let p = corners[i];
            self.vertices.push(Vertex {
                position: [p.x, p.y, p.z],
                color,
                uv: uvs[i],
            });
        }
    }

    pub fn into_mesh(self) -> ChunkMesh {
        ChunkMesh {
            vertices: self.vertices,
        }
    }
}
