//! Deterministic column generation: layered terrain, then trees, then caves.

mod caves;
mod terrain;
mod trees;

use strata_blocks::{Block, BlockId, BlockRegistry, BlockTemplate, RegistryError, TemplateRegistry};

use crate::noise::{NoiseField, hash2_01, remap, remap_clamped, smoothstep3};
use crate::voxel::{BLOCKS_PER_CHUNK, ChunkCoord};
use crate::worldgen::{GenerationMode, WorldConfig};

pub use caves::{CaveCarver, CavePath};

/// Block ids the generator places, resolved once from the registry.
#[derive(Clone, Copy, Debug)]
pub struct Palette {
    pub air: BlockId,
    pub water: BlockId,
    pub stone: BlockId,
    pub dirt: BlockId,
    pub grass: BlockId,
    pub coal: BlockId,
    pub iron: BlockId,
    pub gold: BlockId,
    pub diamond: BlockId,
    pub glowstone: BlockId,
    pub sand: BlockId,
    pub ice: BlockId,
    pub snow: BlockId,
    pub snowgrass: BlockId,
    pub cloud: BlockId,
}

impl Palette {
    pub fn resolve(reg: &BlockRegistry) -> Result<Self, RegistryError> {
        Ok(Self {
            air: reg.require("air")?,
            water: reg.require("water")?,
            stone: reg.require("stone")?,
            dirt: reg.require("dirt")?,
            grass: reg.require("grass")?,
            coal: reg.require("coal")?,
            iron: reg.require("iron")?,
            gold: reg.require("gold")?,
            diamond: reg.require("diamond")?,
            glowstone: reg.require("glowstone")?,
            sand: reg.require("sand")?,
            ice: reg.require("ice")?,
            snow: reg.require("snow")?,
            snowgrass: reg.require("snowgrass")?,
            cloud: reg.require("cloud")?,
        })
    }
}

/// Climate values for one world column, each roughly in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnClimate {
    pub temperature: f32,
    pub humidity: f32,
    pub cloudness: f32,
}

struct TreeTemplates {
    oak: BlockTemplate,
    spruce: BlockTemplate,
    cactus: BlockTemplate,
}

struct Fields {
    temperature: NoiseField,
    humidity: NoiseField,
    cloudness: NoiseField,
    oceanness: NoiseField,
    hilliness: NoiseField,
    mountains: NoiseField,
    forestness: NoiseField,
}

impl Fields {
    fn new(seed: u32) -> Self {
        let s = |k: u32| seed.wrapping_add(k);
        Self {
            mountains: NoiseField::perlin(seed, 200.0, 7),
            temperature: NoiseField::perlin(s(1), 800.0, 9),
            humidity: NoiseField::perlin(s(2), 800.0, 5),
            oceanness: NoiseField::perlin(s(3), 800.0, 7),
            hilliness: NoiseField::perlin(s(4), 400.0, 5),
            forestness: NoiseField::perlin(s(6), 200.0, 10),
            cloudness: NoiseField::perlin(s(9), 30.0, 9),
        }
    }
}

/// Seed offsets for the hash-noise streams.
pub(crate) mod streams {
    pub const TREE_GRID: u32 = 5;
    pub const CAVE_START: u32 = 7;
    pub const CAVE_SEED: u32 = 8;
    pub const COLUMN_RNG: u32 = 11;
    pub const TEMPERATURE_JITTER: u32 = 21;
}

/// Pure function of `(seed, coord)` producing a full column of blocks.
pub struct Generator {
    seed: u32,
    mode: GenerationMode,
    flat_height: i32,
    trees_enabled: bool,
    caves_enabled: bool,
    biome_trees: bool,
    palette: Palette,
    trees: TreeTemplates,
    fields: Fields,
    caves: CaveCarver,
}

impl Generator {
    pub fn new(
        config: &WorldConfig,
        registry: &BlockRegistry,
        templates: &TemplateRegistry,
    ) -> Result<Self, RegistryError> {
        let seed = config.seed;
        Ok(Self {
            seed,
            mode: config.generation.mode,
            flat_height: config.generation.flat_height,
            trees_enabled: config.generation.trees,
            caves_enabled: config.generation.caves,
            biome_trees: config.generation.biome_trees,
            palette: Palette::resolve(registry)?,
            trees: TreeTemplates {
                oak: templates.get("oak_tree")?.clone(),
                spruce: templates.get("spruce_tree")?.clone(),
                cactus: templates.get("cactus")?.clone(),
            },
            fields: Fields::new(seed),
            caves: CaveCarver::new(seed),
        })
    }

    #[inline]
    pub fn seed(&self) -> u32 {
        self.seed
    }

    #[inline]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub fn climate(&self, gx: i32, gy: i32) -> ColumnClimate {
        let (x, y) = (gx as f32, gy as f32);
        let jitter = 0.01 * hash2_01(gx, gy, self.seed.wrapping_add(streams::TEMPERATURE_JITTER));
        ColumnClimate {
            temperature: self.fields.temperature.sample01(x, y) + jitter,
            humidity: self.fields.humidity.sample01(x, y),
            cloudness: remap(self.fields.cloudness.sample(x, y), -1.0, 1.0, 0.0, 1.0),
        }
    }

    /// Height of the topmost terrain block (grass, sand or snow) in a column.
    pub fn ground_height(&self, gx: i32, gy: i32) -> i32 {
        match self.mode {
            GenerationMode::Flat => self.flat_height.clamp(0, terrain::MAX_GROUND),
            GenerationMode::Normal => terrain::ground_height(&self.fields, gx, gy),
        }
    }

    fn forest_threshold(&self, gx: i32, gy: i32) -> f32 {
        let forestness = self.fields.forestness.sample01(gx as f32, gy as f32);
        remap_clamped(forestness, 0.75, 1.0, 1.0, 0.5)
    }

    fn tree_template(&self, gx: i32, gy: i32) -> &BlockTemplate {
        if !self.biome_trees {
            return &self.trees.oak;
        }
        let climate = self.climate(gx, gy);
        if climate.temperature < 0.4 {
            &self.trees.spruce
        } else if climate.humidity < 0.3 {
            &self.trees.cactus
        } else {
            &self.trees.oak
        }
    }

    pub fn generate(&self, coord: ChunkCoord) -> Box<[Block]> {
        let mut blocks = vec![Block::AIR; BLOCKS_PER_CHUNK].into_boxed_slice();
        match self.mode {
            GenerationMode::Flat => terrain::fill_flat(self, &mut blocks),
            GenerationMode::Normal => {
                terrain::fill_columns(self, coord, &mut blocks);
                if self.trees_enabled {
                    trees::plant(self, coord, &mut blocks);
                }
                if self.caves_enabled {
                    self.caves.carve(coord, &self.palette, &mut blocks);
                }
            }
        }
        blocks
    }
}

#[inline]
fn smooth_twice(v: f32) -> f32 {
    smoothstep3(smoothstep3(v.clamp(0.0, 1.0)))
}
