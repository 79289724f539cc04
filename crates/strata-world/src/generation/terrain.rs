use strata_blocks::Block;

use super::{Fields, Generator, smooth_twice, streams};
use crate::noise::{HashRng, hash2, remap_clamped};
use crate::voxel::{CHUNK_SIZE_X, CHUNK_SIZE_Y, CHUNK_SIZE_Z, ChunkCoord, SEA_LEVEL, pack_local};

const RIVER_DEPTH: i32 = 6;
const MOUNTAIN_MAX: i32 = CHUNK_SIZE_Z as i32 - SEA_LEVEL + RIVER_DEPTH;
const OCEAN_DEPTH: f32 = (SEA_LEVEL - 32) as f32;
const CLOUD_LEVEL: i32 = 125;

pub(super) const MAX_GROUND: i32 = CHUNK_SIZE_Z as i32 - 1;

const COAL_CHANCE: f32 = 0.05;
const IRON_CHANCE: f32 = 0.02;
const GOLD_CHANCE: f32 = 0.005;
const DIAMOND_CHANCE: f32 = 0.001;

pub(super) fn ground_height(fields: &Fields, gx: i32, gy: i32) -> i32 {
    let (x, y) = (gx as f32, gy as f32);
    let oceanness = smooth_twice(fields.oceanness.sample01(x, y));
    let hilliness = smooth_twice(fields.hilliness.sample01(x, y));
    let mountain = fields.mountains.sample(x, y).abs();
    let mut ground = SEA_LEVEL - RIVER_DEPTH + (hilliness * MOUNTAIN_MAX as f32 * mountain) as i32;
    ground -= (remap_clamped(oceanness, 0.5, 1.0, 0.0, 1.0) * OCEAN_DEPTH) as i32;
    ground.clamp(1, MAX_GROUND)
}

pub(super) fn fill_flat(generator: &Generator, blocks: &mut [Block]) {
    let p = generator.palette;
    let height = generator.ground_height(0, 0) as usize;
    for z in 0..=height.min(CHUNK_SIZE_Z - 1) {
        let id = if z == height { p.grass } else { p.stone };
        for y in 0..CHUNK_SIZE_Y {
            for x in 0..CHUNK_SIZE_X {
                blocks[pack_local(x, y, z)] = Block::new(id);
            }
        }
    }
}

pub(super) fn fill_columns(generator: &Generator, coord: ChunkCoord, blocks: &mut [Block]) {
    let (x0, y0) = coord.origin();
    for y in 0..CHUNK_SIZE_Y {
        for x in 0..CHUNK_SIZE_X {
            fill_column(generator, x0 + x as i32, y0 + y as i32, x, y, blocks);
        }
    }
}

fn fill_column(generator: &Generator, gx: i32, gy: i32, lx: usize, ly: usize, blocks: &mut [Block]) {
    let p = generator.palette;
    let climate = generator.climate(gx, gy);
    let ground = generator.ground_height(gx, gy);
    let mut rng = HashRng::new(hash2(gx, gy, generator.seed.wrapping_add(streams::COLUMN_RNG)));

    let ice_depth = remap_clamped(climate.temperature, 0.0, 0.4, 20.0, 0.0).floor() as i32;
    let ice_height = SEA_LEVEL - ice_depth;
    let sand_depth = remap_clamped(climate.humidity, 0.0, 0.4, 8.0, 0.0).floor() as i32;
    let sand_height = ground - sand_depth;
    let freeze_level = SEA_LEVEL + (climate.temperature * 50.0) as i32;
    let dirt_min = ground - rng.range_i32(3, 4);

    for z in 0..CHUNK_SIZE_Z as i32 {
        let mut id = p.air;
        if z < dirt_min {
            id = p.stone;
            // Later rolls win, so rarer ores overwrite common ones.
            if rng.chance(COAL_CHANCE) {
                id = p.coal;
            }
            if rng.chance(IRON_CHANCE) {
                id = p.iron;
            }
            if rng.chance(GOLD_CHANCE) {
                id = p.gold;
            }
            if rng.chance(DIAMOND_CHANCE) {
                id = p.diamond;
            }
        } else if z < ground {
            id = if z > sand_height { p.sand } else { p.dirt };
        } else if z == ground {
            let beach = climate.humidity < 0.65 && z == SEA_LEVEL;
            id = if beach || z > sand_height { p.sand } else { p.grass };
        }

        if id == p.air && z <= SEA_LEVEL {
            id = if z > ice_height { p.ice } else { p.water };
        }
        if z == CLOUD_LEVEL && climate.cloudness > 0.7 {
            id = p.cloud;
        }
        if z >= freeze_level && z <= ground {
            id = if z == freeze_level { p.snowgrass } else { p.snow };
        }

        blocks[pack_local(lx, ly, z as usize)] = Block::new(id);
    }
}
