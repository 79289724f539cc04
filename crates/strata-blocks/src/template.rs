use std::collections::HashMap;

use super::config::{BlocksConfig, TemplateConfig};
use super::error::RegistryError;
use super::registry::{BUILTIN_BLOCKS_TOML, BlockRegistry};
use super::types::BlockId;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TemplateEntry {
    pub id: BlockId,
    pub offset: [i32; 3],
}

/// A small multi-block structure (trees, cacti) stamped relative to a base
/// position. Later entries overwrite earlier ones at the same offset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockTemplate {
    pub name: String,
    pub entries: Vec<TemplateEntry>,
}

impl BlockTemplate {
    /// Largest |dx| or |dy| of any entry.
    pub fn lateral_radius(&self) -> i32 {
        self.entries
            .iter()
            .map(|e| e.offset[0].abs().max(e.offset[1].abs()))
            .max()
            .unwrap_or(0)
    }

    fn from_config(cfg: &TemplateConfig, reg: &BlockRegistry) -> Result<Self, RegistryError> {
        let mut entries = Vec::new();
        for e in &cfg.entries {
            let id = reg.require(&e.block)?;
            match (e.offset, e.min, e.max) {
                (Some(offset), None, None) => entries.push(TemplateEntry { id, offset }),
                (None, Some(min), Some(max)) => {
                    for z in min[2]..=max[2] {
                        for y in min[1]..=max[1] {
                            for x in min[0]..=max[0] {
                                entries.push(TemplateEntry {
                                    id,
                                    offset: [x, y, z],
                                });
                            }
                        }
                    }
                }
                _ => {
                    return Err(RegistryError::MalformedTemplateEntry {
                        template: cfg.name.clone(),
                        block: e.block.clone(),
                    });
                }
            }
        }
        Ok(Self {
            name: cfg.name.clone(),
            entries,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, BlockTemplate>,
}

impl TemplateRegistry {
    pub fn builtin(reg: &BlockRegistry) -> Result<Self, RegistryError> {
        let cfg: BlocksConfig = toml::from_str(BUILTIN_BLOCKS_TOML)?;
        Self::from_config(&cfg, reg)
    }

    pub fn from_config(cfg: &BlocksConfig, reg: &BlockRegistry) -> Result<Self, RegistryError> {
        let mut templates = HashMap::with_capacity(cfg.templates.len());
        for t in &cfg.templates {
            let template = BlockTemplate::from_config(t, reg)?;
            if templates.insert(t.name.clone(), template).is_some() {
                return Err(RegistryError::DuplicateName(t.name.clone()));
            }
        }
        Ok(Self { templates })
    }

    /// Looks up a template by name. A missing name is a configuration error.
    pub fn get(&self, name: &str) -> Result<&BlockTemplate, RegistryError> {
        self.templates
            .get(name)
            .ok_or_else(|| RegistryError::UnknownTemplate(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_oak_tree_shape() {
        let reg = BlockRegistry::builtin().unwrap();
        let templates = TemplateRegistry::builtin(&reg).unwrap();
        let oak = templates.get("oak_tree").unwrap();
        let log = reg.require("oak_log").unwrap();
        let leaves = reg.require("oak_leaves").unwrap();
        let logs = oak.entries.iter().filter(|e| e.id == log).count();
        let leaf_count = oak.entries.iter().filter(|e| e.id == leaves).count();
        assert_eq!(logs, 4);
        assert_eq!(leaf_count, 18);
        assert!(oak.entries.contains(&TemplateEntry {
            id: leaves,
            offset: [0, 0, 5]
        }));
        assert_eq!(oak.lateral_radius(), 1);
    }

    #[test]
    fn cactus_is_a_four_high_column() {
        let reg = BlockRegistry::builtin().unwrap();
        let templates = TemplateRegistry::builtin(&reg).unwrap();
        let cactus = templates.get("cactus").unwrap();
        let zs: Vec<i32> = cactus.entries.iter().map(|e| e.offset[2]).collect();
        assert_eq!(zs, vec![0, 1, 2, 3]);
        assert_eq!(cactus.lateral_radius(), 0);
    }

    #[test]
    fn unknown_template_is_an_error() {
        let reg = BlockRegistry::builtin().unwrap();
        let templates = TemplateRegistry::builtin(&reg).unwrap();
        assert!(matches!(
            templates.get("palm_tree"),
            Err(RegistryError::UnknownTemplate(n)) if n == "palm_tree"
        ));
    }
}
