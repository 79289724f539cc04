use serde::Deserialize;

#[derive(Deserialize, Clone, Debug, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDefConfig>,
    #[serde(default)]
    pub templates: Vec<TemplateConfig>,
}

/// One `[[blocks]]` entry. Omitted flags fall back to a visible solid cube;
/// `opaque` defaults to `solid`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct BlockDefConfig {
    pub name: String,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub opaque: Option<bool>,
    #[serde(default)]
    pub emission: Option<u8>,
    /// Sprite used for every face unless a per-role sprite is given.
    #[serde(default)]
    pub sprite: Option<[u8; 2]>,
    #[serde(default)]
    pub top: Option<[u8; 2]>,
    #[serde(default)]
    pub side: Option<[u8; 2]>,
    #[serde(default)]
    pub bottom: Option<[u8; 2]>,
}

#[derive(Deserialize, Clone, Debug, Default)]
pub struct TemplateConfig {
    pub name: String,
    #[serde(default)]
    pub entries: Vec<TemplateEntryConfig>,
}

/// Either a single block at `offset` or an inclusive box `min..=max`.
#[derive(Deserialize, Clone, Debug, Default)]
pub struct TemplateEntryConfig {
    pub block: String,
    #[serde(default)]
    pub offset: Option<[i32; 3]>,
    #[serde(default)]
    pub min: Option<[i32; 3]>,
    #[serde(default)]
    pub max: Option<[i32; 3]>,
}
