use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Everything the world reads from its TOML config. Read-only once the world
/// is constructed.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default)]
    pub seed: u32,
    #[serde(default = "default_activation_range")]
    pub activation_range: f32,
    #[serde(default = "default_true")]
    pub auto_create_chunks: bool,
    #[serde(default = "default_true")]
    pub load_saved_chunks: bool,
    #[serde(default = "default_true")]
    pub save_modified_chunks: bool,
    #[serde(default = "default_save_root")]
    pub save_root: PathBuf,
    #[serde(default = "default_reach")]
    pub reach: f32,
    #[serde(default = "default_mesh_rebuilds")]
    pub max_mesh_rebuilds_per_step: usize,
    #[serde(default)]
    pub generation: Generation,
    #[serde(default)]
    pub debug: DebugToggles,
    #[serde(default)]
    pub sky: Sky,
    #[serde(default)]
    pub runtime: RuntimeSettings,
}

fn default_activation_range() -> f32 {
    200.0
}
fn default_true() -> bool {
    true
}
fn default_save_root() -> PathBuf {
    PathBuf::from("Saves")
}
fn default_reach() -> f32 {
    10.0
}
fn default_mesh_rebuilds() -> usize {
    10
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            activation_range: default_activation_range(),
            auto_create_chunks: true,
            load_saved_chunks: true,
            save_modified_chunks: true,
            save_root: default_save_root(),
            reach: default_reach(),
            max_mesh_rebuilds_per_step: default_mesh_rebuilds(),
            generation: Generation::default(),
            debug: DebugToggles::default(),
            sky: Sky::default(),
            runtime: RuntimeSettings::default(),
        }
    }
}

impl WorldConfig {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(text)?;
        if !(cfg.activation_range.is_finite() && cfg.activation_range >= 0.0) {
            return Err(format!("activation_range must be >= 0 (got {})", cfg.activation_range).into());
        }
        Ok(cfg)
    }

    /// Chunks farther than this (center to viewpoint, XY) are deactivated.
    #[inline]
    pub fn deactivation_range(&self) -> f32 {
        self.activation_range + crate::CHUNK_SIZE_X as f32
    }

    /// Half-width, in chunks, of the square scanned for activation candidates.
    #[inline]
    pub fn activation_radius_chunks(&self) -> i32 {
        1 + (self.activation_range / crate::CHUNK_SIZE_X as f32) as i32
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GenerationMode {
    Normal,
    Flat,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Generation {
    #[serde(default = "default_mode")]
    pub mode: GenerationMode,
    #[serde(default = "default_flat_height")]
    pub flat_height: i32,
    #[serde(default = "default_true")]
    pub trees: bool,
    #[serde(default = "default_true")]
    pub caves: bool,
    /// Pick spruce or cactus by climate instead of always planting oaks.
    #[serde(default)]
    pub biome_trees: bool,
}

fn default_mode() -> GenerationMode {
    GenerationMode::Normal
}
fn default_flat_height() -> i32 {
    20
}

impl Default for Generation {
    fn default() -> Self {
        Self {
            mode: default_mode(),
            flat_height: default_flat_height(),
            trees: true,
            caves: true,
            biome_trees: false,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct DebugToggles {
    /// Process a single light queue entry per step.
    #[serde(default)]
    pub step_light_propagation: bool,
    /// Emit faces even when the neighbor is opaque.
    #[serde(default)]
    pub disable_hsr: bool,
    #[serde(default)]
    pub use_white_blocks: bool,
}

pub type Rgb = [u8; 3];

#[derive(Clone, Debug, Deserialize)]
pub struct Sky {
    #[serde(default = "default_time_scale")]
    pub world_time_scale: f32,
    /// Fraction of a day the world starts at (0.5 is noon).
    #[serde(default = "default_start_time")]
    pub start_time: f32,
    #[serde(default = "default_day_sky")]
    pub day_sky_color: Rgb,
    #[serde(default = "default_night_sky")]
    pub night_sky_color: Rgb,
    #[serde(default = "default_day_outdoor")]
    pub day_outdoor_light: Rgb,
    #[serde(default = "default_night_outdoor")]
    pub night_outdoor_light: Rgb,
    #[serde(default = "default_indoor")]
    pub indoor_light: Rgb,
}

fn default_time_scale() -> f32 {
    200.0
}
fn default_start_time() -> f32 {
    0.5
}
fn default_day_sky() -> Rgb {
    [200, 230, 255]
}
fn default_night_sky() -> Rgb {
    [20, 20, 40]
}
fn default_day_outdoor() -> Rgb {
    [255, 255, 255]
}
fn default_night_outdoor() -> Rgb {
    [60, 60, 110]
}
fn default_indoor() -> Rgb {
    [255, 230, 204]
}

impl Default for Sky {
    fn default() -> Self {
        Self {
            world_time_scale: default_time_scale(),
            start_time: default_start_time(),
            day_sky_color: default_day_sky(),
            night_sky_color: default_night_sky(),
            day_outdoor_light: default_day_outdoor(),
            night_outdoor_light: default_night_outdoor(),
            indoor_light: default_indoor(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct RuntimeSettings {
    /// Worker threads for generation. Defaults to the available parallelism
    /// minus the dedicated disk thread.
    #[serde(default)]
    pub generation_threads: Option<usize>,
}
