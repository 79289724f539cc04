use strata_blocks::{Block, BlockTemplate};

use super::{Generator, streams};
use crate::noise::hash2_01;
use crate::voxel::{CHUNK_SIZE_X, CHUNK_SIZE_Y, ChunkCoord, SEA_LEVEL, try_pack_local};

/// Trees rooted this far outside the chunk can still reach into it.
const MAX_TREE_RADIUS: i32 = 3;
const GRID_PAD: i32 = MAX_TREE_RADIUS + 1;

/// Plants a tree on every column whose hash value is a strict local maximum
/// above the local forest threshold, on dry ground.
pub(super) fn plant(generator: &Generator, coord: ChunkCoord, blocks: &mut [Block]) {
    let (x0, y0) = coord.origin();
    let w = CHUNK_SIZE_X as i32 + 2 * GRID_PAD;
    let h = CHUNK_SIZE_Y as i32 + 2 * GRID_PAD;
    let seed = generator.seed.wrapping_add(streams::TREE_GRID);
    let grid: Vec<f32> = (0..h)
        .flat_map(|j| (0..w).map(move |i| (i, j)))
        .map(|(i, j)| hash2_01(x0 - GRID_PAD + i, y0 - GRID_PAD + j, seed))
        .collect();
    let at = |i: i32, j: i32| grid[(j * w + i) as usize];

    for j in 1..h - 1 {
        for i in 1..w - 1 {
            let v = at(i, j);
            let is_peak = (-1..=1)
                .flat_map(|dj| (-1..=1).map(move |di| (di, dj)))
                .filter(|&(di, dj)| di != 0 || dj != 0)
                .all(|(di, dj)| v > at(i + di, j + dj));
            if !is_peak {
                continue;
            }
            let gx = x0 - GRID_PAD + i;
            let gy = y0 - GRID_PAD + j;
            if v < generator.forest_threshold(gx, gy) {
                continue;
            }
            let ground = generator.ground_height(gx, gy);
            if ground <= SEA_LEVEL {
                continue;
            }
            stamp(generator.tree_template(gx, gy), gx - x0, gy - y0, ground + 1, blocks);
        }
    }
}

/// Writes a template with its origin at local `(lx, ly, z)`, clipped to the chunk.
pub(super) fn stamp(template: &BlockTemplate, lx: i32, ly: i32, z: i32, blocks: &mut [Block]) {
    for e in &template.entries {
        let [dx, dy, dz] = e.offset;
        if let Some(idx) = try_pack_local(lx + dx, ly + dy, z + dz) {
            blocks[idx] = Block::new(e.id);
        }
    }
}
