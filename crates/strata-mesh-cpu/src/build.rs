use strata_blocks::{Block, BlockRegistry, FaceRole, SpriteCoords};
use strata_chunk::{BlockIter, ChunkMap, ChunkMesh};
use strata_geom::Vec3;
use strata_world::worldgen::DebugToggles;
use strata_world::{BLOCKS_PER_CHUNK, ChunkCoord, Face};

use crate::emit::MeshBuild;

const UNLIT_WHITE: [u8; 4] = [255, 255, 255, 255];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshOptions {
    /// Skip faces whose neighbor is opaque.
    pub hidden_surface_removal: bool,
    /// Map every face to this sprite instead of the block's own.
    pub white_sprite: Option<SpriteCoords>,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            hidden_surface_removal: true,
            white_sprite: None,
        }
    }
}

impl MeshOptions {
    pub fn from_debug(debug: &DebugToggles) -> Self {
        Self {
            hidden_surface_removal: !debug.disable_hsr,
            white_sprite: debug.use_white_blocks.then_some(SpriteCoords::WHITE),
        }
    }
}

/// Face tint from the light of the block on the far side of the face.
#[inline]
pub fn face_color(neighbor: Block) -> [u8; 4] {
    [
        neighbor.outdoor_light() * 17,
        neighbor.indoor_light() * 17,
        127,
        255,
    ]
}

/// Corners of one face of the box `min..max`, counter-clockwise from outside,
/// in `[bl, br, tr, tl]` order.
pub fn face_corners(face: Face, min: Vec3, max: Vec3) -> [Vec3; 4] {
    let v = Vec3::new;
    match face {
        Face::East => [
            v(max.x, min.y, min.z),
            v(max.x, max.y, min.z),
            v(max.x, max.y, max.z),
            v(max.x, min.y, max.z),
        ],
        Face::West => [
            v(min.x, max.y, min.z),
            v(min.x, min.y, min.z),
            v(min.x, min.y, max.z),
            v(min.x, max.y, max.z),
        ],
        Face::North => [
            v(max.x, max.y, min.z),
            v(min.x, max.y, min.z),
            v(min.x, max.y, max.z),
            v(max.x, max.y, max.z),
        ],
        Face::South => [
            v(min.x, min.y, min.z),
            v(max.x, min.y, min.z),
            v(max.x, min.y, max.z),
            v(min.x, min.y, max.z),
        ],
        Face::Up => [
            v(min.x, min.y, max.z),
            v(max.x, min.y, max.z),
            v(max.x, max.y, max.z),
            v(min.x, max.y, max.z),
        ],
        Face::Down => [
            v(max.x, min.y, min.z),
            v(min.x, min.y, min.z),
            v(min.x, max.y, min.z),
            v(max.x, max.y, min.z),
        ],
    }
}

#[inline]
fn role(face: Face) -> FaceRole {
    match face {
        Face::Up => FaceRole::Top,
        Face::Down => FaceRole::Bottom,
        _ => FaceRole::Side,
    }
}

/// Builds the triangle list for an active chunk, or `None` if `coord` is not
/// in the map.
///
/// Faces look across into neighbor chunks through the map's links. A face
/// with no block beyond it is drawn unlit white, except at the bottom of the
/// world where it is never visible.
pub fn build_chunk_mesh(
    map: &ChunkMap,
    coord: ChunkCoord,
    reg: &BlockRegistry,
    opts: MeshOptions,
) -> Option<ChunkMesh> {
    let chunk = map.get(coord)?;
    let (ox, oy) = coord.origin();
    let mut out = MeshBuild::with_quad_capacity(1024);
    for index in 0..BLOCKS_PER_CHUNK {
        let block = chunk.block(index);
        let Some(def) = reg.get(block.id) else {
            continue;
        };
        if !def.visible {
            continue;
        }
        let it = BlockIter::new(coord, index);
        let (x, y, z) = it.local();
        let min = Vec3::new((ox + x as i32) as f32, (oy + y as i32) as f32, z as f32);
        let max = min + Vec3::splat(1.0);
        for face in Face::ALL {
            let color = match map.step(it, face).and_then(|n| map.block(n)) {
                Some(n) if opts.hidden_surface_removal && reg.is_opaque(n.id) => continue,
                Some(n) => face_color(n),
                None if face == Face::Down => continue,
                None => UNLIT_WHITE,
            };
            let sprite = opts.white_sprite.unwrap_or_else(|| def.sprite(role(face)));
            out.add_quad(face_corners(face, min, max), sprite.uv_rect(), color);
        }
    }
    log::trace!(target: "mesh", "chunk {} meshed into {} quads", coord, out.quad_count());
    Some(out.into_mesh())
}
