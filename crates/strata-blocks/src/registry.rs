use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::{BlockDefConfig, BlocksConfig};
use super::error::RegistryError;
use super::types::{AIR_ID, BlockId, FaceRole, SpriteCoords};

/// Block catalog shipped with the crate.
pub const BUILTIN_BLOCKS_TOML: &str = include_str!("../assets/blocks.toml");

const MAX_BLOCK_DEFS: usize = BlockId::MAX as usize + 1;

/// Immutable description of one block type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockDef {
    pub id: BlockId,
    pub name: String,
    pub visible: bool,
    pub solid: bool,
    pub opaque: bool,
    pub emission: u8,
    pub top: SpriteCoords,
    pub side: SpriteCoords,
    pub bottom: SpriteCoords,
}

impl BlockDef {
    #[inline]
    pub fn sprite(&self, role: FaceRole) -> SpriteCoords {
        match role {
            FaceRole::Top => self.top,
            FaceRole::Bottom => self.bottom,
            FaceRole::Side => self.side,
        }
    }

    fn from_config(id: BlockId, cfg: &BlockDefConfig) -> Result<Self, RegistryError> {
        let solid = cfg.solid.unwrap_or(true);
        let emission = cfg.emission.unwrap_or(0);
        if emission > 15 {
            return Err(RegistryError::EmissionOutOfRange {
                name: cfg.name.clone(),
                emission,
            });
        }
        let all = cfg.sprite.map(SpriteCoords::from).unwrap_or_default();
        Ok(Self {
            id,
            name: cfg.name.clone(),
            visible: cfg.visible.unwrap_or(true),
            solid,
            opaque: cfg.opaque.unwrap_or(solid),
            emission,
            top: cfg.top.map(SpriteCoords::from).unwrap_or(all),
            side: cfg.side.map(SpriteCoords::from).unwrap_or(all),
            bottom: cfg.bottom.map(SpriteCoords::from).unwrap_or(all),
        })
    }
}

/// Ordered block table; a definition's position is its id.
#[derive(Clone, Debug, Default)]
pub struct BlockRegistry {
    blocks: Vec<BlockDef>,
    by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_toml_str(BUILTIN_BLOCKS_TOML)
    }

    pub fn from_toml_str(src: &str) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(src)?;
        Self::from_config(&cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&text)?)
    }

    pub fn from_config(cfg: &BlocksConfig) -> Result<Self, RegistryError> {
        if cfg.blocks.is_empty() {
            return Err(RegistryError::Empty);
        }
        if cfg.blocks.len() > MAX_BLOCK_DEFS {
            return Err(RegistryError::TooManyBlocks(cfg.blocks.len()));
        }
        let mut reg = BlockRegistry {
            blocks: Vec::with_capacity(cfg.blocks.len()),
            by_name: HashMap::with_capacity(cfg.blocks.len()),
        };
        for (i, def_cfg) in cfg.blocks.iter().enumerate() {
            let id = i as BlockId;
            let def = BlockDef::from_config(id, def_cfg)?;
            if reg.by_name.insert(def.name.clone(), id).is_some() {
                return Err(RegistryError::DuplicateName(def.name));
            }
            reg.blocks.push(def);
        }
        let air = &reg.blocks[AIR_ID as usize];
        if air.name != "air" || air.visible || air.solid || air.opaque || air.emission != 0 {
            return Err(RegistryError::ReservedAir(air.name.clone()));
        }
        Ok(reg)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockDef> {
        self.blocks.get(id as usize)
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    /// Like [`id_by_name`](Self::id_by_name) but a missing name is an error.
    pub fn require(&self, name: &str) -> Result<BlockId, RegistryError> {
        self.id_by_name(name)
            .ok_or_else(|| RegistryError::UnknownBlock(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BlockDef> {
        self.blocks.iter()
    }

    // Unknown ids behave like air in the hot-path predicates below.

    #[inline]
    pub fn is_opaque(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|d| d.opaque)
    }

    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|d| d.solid)
    }

    #[inline]
    pub fn is_visible(&self, id: BlockId) -> bool {
        self.get(id).is_some_and(|d| d.visible)
    }

    #[inline]
    pub fn emission(&self, id: BlockId) -> u8 {
        self.get(id).map_or(0, |d| d.emission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_has_expected_order_and_flags() {
        let reg = BlockRegistry::builtin().unwrap();
        assert_eq!(reg.len(), 22);
        assert_eq!(reg.id_by_name("air"), Some(0));
        assert_eq!(reg.id_by_name("water"), Some(1));
        assert_eq!(reg.id_by_name("snowgrass"), Some(21));
        let grass = reg.get(reg.require("grass").unwrap()).unwrap();
        assert_eq!(grass.top, SpriteCoords::new(32, 33));
        assert_eq!(grass.side, SpriteCoords::new(33, 33));
        assert_eq!(grass.bottom, SpriteCoords::new(32, 34));
        let water = reg.get(1).unwrap();
        assert!(water.visible && water.opaque && !water.solid);
        assert_eq!(reg.emission(reg.require("glowstone").unwrap()), 15);
    }

    #[test]
    fn unknown_ids_read_as_air() {
        let reg = BlockRegistry::builtin().unwrap();
        assert!(!reg.is_opaque(200));
        assert_eq!(reg.emission(200), 0);
        assert!(reg.get(200).is_none());
    }

    #[test]
    fn rejects_table_without_air_first() {
        let err = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "stone"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::ReservedAir(n) if n == "stone"));
    }

    #[test]
    fn rejects_duplicates_and_bright_emitters() {
        let dup = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "air"
            visible = false
            solid = false
            [[blocks]]
            name = "stone"
            [[blocks]]
            name = "stone"
            "#,
        )
        .unwrap_err();
        assert!(matches!(dup, RegistryError::DuplicateName(n) if n == "stone"));

        let bright = BlockRegistry::from_toml_str(
            r#"
            [[blocks]]
            name = "air"
            visible = false
            solid = false
            [[blocks]]
            name = "lamp"
            emission = 16
            "#,
        )
        .unwrap_err();
        assert!(matches!(bright, RegistryError::EmissionOutOfRange { emission: 16, .. }));
    }

    #[test]
    fn require_reports_missing_names() {
        let reg = BlockRegistry::builtin().unwrap();
        let err = reg.require("obsidian").unwrap_err();
        assert_eq!(err.to_string(), "unknown block 'obsidian'");
    }
}
