use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown block '{0}'")]
    UnknownBlock(String),
    #[error("unknown block template '{0}'")]
    UnknownTemplate(String),
    #[error("duplicate name '{0}'")]
    DuplicateName(String),
    #[error("id 0 must be an invisible, non-solid, non-opaque 'air' block (found '{0}')")]
    ReservedAir(String),
    #[error("block table is empty")]
    Empty,
    #[error("too many block definitions: {0} (max 256)")]
    TooManyBlocks(usize),
    #[error("block '{name}' has emission {emission} (max 15)")]
    EmissionOutOfRange { name: String, emission: u8 },
    #[error("template '{template}' entry for '{block}' needs either an offset or a min/max box")]
    MalformedTemplateEntry { template: String, block: String },
    #[error("failed to parse block table: {0}")]
    Parse(#[from] toml::de::Error),
}
