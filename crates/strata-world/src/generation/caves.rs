//! Wandering "crawler" caves.
//!
//! A small fraction of chunks seed a cave. Each cave walks a fixed number of
//! steps from a hashed start point, turning a little every step, and carves a
//! capsule of air around each segment. Everything about a cave depends only on
//! the world seed and the chunk that started it, so neighboring chunks carve
//! matching halves of the same tunnel.

use fastnoise_lite::{FastNoiseLite, NoiseType};
use strata_blocks::Block;
use strata_geom::{Aabb, Vec3, distance_to_segment};

use super::{Palette, streams};
use crate::noise::{HashRng, hash2, hash2_01};
use crate::voxel::{CHUNK_SIZE_X, CHUNK_SIZE_Z, ChunkCoord, SEA_LEVEL, pack_local};

const START_CHANCE: f32 = 0.01;
const MAX_DISTANCE: f32 = 200.0;
const SEARCH_RADIUS_CHUNKS: i32 = 1 + MAX_DISTANCE as i32 / CHUNK_SIZE_X as i32;
const STEPS: usize = 25;
const STEP_LENGTH: f32 = 10.0;
const MAX_TURN_DEGREES: f32 = 30.0;
const MAX_DIVE_DEGREES: f32 = 10.0;
const RADIUS: f32 = 5.0;
const START_Z: (i32, i32) = (30, 50);
const LAMP_INTERVAL: usize = 5;

/// The nodes of one cave, start point first.
#[derive(Clone, Debug, PartialEq)]
pub struct CavePath {
    pub origin: ChunkCoord,
    pub nodes: Vec<Vec3>,
}

impl CavePath {
    pub fn bounds(&self) -> Aabb {
        let mut min = self.nodes[0];
        let mut max = self.nodes[0];
        for n in &self.nodes[1..] {
            min = min.min(*n);
            max = max.max(*n);
        }
        let r = Vec3::splat(RADIUS);
        Aabb::new(min - r, max + r)
    }

    pub fn segments(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.nodes.windows(2).map(|w| (w[0], w[1]))
    }
}

pub struct CaveCarver {
    seed: u32,
    pitch: FastNoiseLite,
}

impl CaveCarver {
    pub fn new(seed: u32) -> Self {
        let mut pitch = FastNoiseLite::with_seed(seed.wrapping_add(streams::CAVE_SEED) as i32);
        pitch.set_noise_type(Some(NoiseType::Perlin));
        pitch.set_frequency(Some(1.0 / 5.0));
        Self { seed, pitch }
    }

    #[inline]
    pub fn starts_cave(&self, coord: ChunkCoord) -> bool {
        hash2_01(coord.cx, coord.cy, self.seed.wrapping_add(streams::CAVE_START)) < START_CHANCE
    }

    /// Walks the cave rooted in `origin`.
    pub fn path(&self, origin: ChunkCoord) -> CavePath {
        let cave_seed = hash2(origin.cx, origin.cy, self.seed.wrapping_add(streams::CAVE_SEED));
        let mut rng = HashRng::new(cave_seed);
        let bounds = origin.bounds();
        let mut pos = Vec3::new(
            rng.range_f32(bounds.min.x, bounds.max.x),
            rng.range_f32(bounds.min.y, bounds.max.y),
            rng.range_i32(START_Z.0, START_Z.1) as f32,
        );
        let mut yaw = rng.range_f32(0.0, 360.0);
        // Distinct lane through the pitch noise for every cave.
        let lane = (cave_seed % 10_000) as f32 * 1.7;

        let mut nodes = Vec::with_capacity(STEPS + 1);
        nodes.push(pos);
        for step in 0..STEPS {
            let dive = self.pitch.get_noise_2d(step as f32, lane).clamp(-1.0, 1.0);
            let pitch = (dive * MAX_DIVE_DEGREES).to_radians();
            let yaw_r = yaw.to_radians();
            let forward = Vec3::new(
                pitch.cos() * yaw_r.cos(),
                pitch.cos() * yaw_r.sin(),
                -pitch.sin(),
            );
            pos += forward * STEP_LENGTH;
            nodes.push(pos);
            yaw += rng.range_f32(-MAX_TURN_DEGREES, MAX_TURN_DEGREES);
        }
        CavePath { origin, nodes }
    }

    /// Every cave that could reach `coord`, in a stable order.
    pub fn caves_near(&self, coord: ChunkCoord) -> Vec<CavePath> {
        let r = SEARCH_RADIUS_CHUNKS;
        let chunk_bounds = coord.bounds();
        let mut out = Vec::new();
        for dy in -r..=r {
            for dx in -r..=r {
                let origin = coord.offset(dx, dy);
                if !self.starts_cave(origin) {
                    continue;
                }
                let path = self.path(origin);
                if path.bounds().overlaps(&chunk_bounds) {
                    out.push(path);
                }
            }
        }
        out
    }

    pub fn carve(&self, coord: ChunkCoord, palette: &Palette, blocks: &mut [Block]) {
        for cave in self.caves_near(coord) {
            carve_path(&cave, coord, palette, blocks);
        }
    }
}

fn carve_path(cave: &CavePath, coord: ChunkCoord, palette: &Palette, blocks: &mut [Block]) {
    let chunk_bounds = coord.bounds();
    let (x0, y0) = coord.origin();
    for (a, b) in cave.segments() {
        let seg_bounds = Aabb::around_segment(a, b, RADIUS);
        if !seg_bounds.overlaps(&chunk_bounds) {
            continue;
        }
        let lo = seg_bounds.min.max(chunk_bounds.min);
        let hi = seg_bounds.max.min(chunk_bounds.max);
        for gz in lo.z.floor() as i32..hi.z.ceil() as i32 {
            if gz < 0 || gz >= CHUNK_SIZE_Z as i32 {
                continue;
            }
            for gy in lo.y.floor() as i32..hi.y.ceil() as i32 {
                for gx in lo.x.floor() as i32..hi.x.ceil() as i32 {
                    let (lx, ly) = (gx - x0, gy - y0);
                    if !(0..CHUNK_SIZE_X as i32).contains(&lx) || !(0..CHUNK_SIZE_X as i32).contains(&ly) {
                        continue;
                    }
                    let center = Vec3::new(gx as f32 + 0.5, gy as f32 + 0.5, gz as f32 + 0.5);
                    if distance_to_segment(center, a, b) <= RADIUS {
                        blocks[pack_local(lx as usize, ly as usize, gz as usize)] = Block::new(palette.air);
                    }
                }
            }
        }
    }

    // Glowstone lamps hang at every few nodes below sea level.
    for node in cave.nodes.iter().step_by(LAMP_INTERVAL).skip(1) {
        let (gx, gy, gz) = (node.x.floor() as i32, node.y.floor() as i32, node.z.floor() as i32);
        if gz < 1 || gz >= SEA_LEVEL {
            continue;
        }
        let (lx, ly) = (gx - x0, gy - y0);
        if (0..CHUNK_SIZE_X as i32).contains(&lx) && (0..CHUNK_SIZE_X as i32).contains(&ly) {
            blocks[pack_local(lx as usize, ly as usize, gz as usize)] = Block::new(palette.glowstone);
        }
    }
}
