//! Block identities, hatch kinds, and the content tables loaded at start-up.
#![forbid(unsafe_code)]

pub mod config;
pub mod fuel;
pub mod hatch;
pub mod item;
pub mod registry;
pub mod types;

pub use fuel::FuelRegistry;
pub use hatch::{HatchFlags, HatchKind};
pub use item::{ItemStack, UpgradeTable};
pub use registry::{BlockRegistry, BlockType, RegistryError};
pub use types::{BlockId, CoilSpec};

use std::fs;
use std::path::Path;

use config::ContentConfig;

/// Every static table declared by `blocks.toml`, built once and shared read-only.
#[derive(Clone, Debug, Default)]
pub struct Content {
    pub blocks: BlockRegistry,
    pub fuels: FuelRegistry,
    pub upgrades: UpgradeTable,
}

impl Content {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, RegistryError> {
        let cfg: ContentConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn from_config(cfg: ContentConfig) -> Result<Self, RegistryError> {
        let blocks = BlockRegistry::from_configs(cfg.blocks)?;
        let fuels = FuelRegistry::from_config(cfg.fuels)?;
        let upgrades = UpgradeTable::from_config(cfg.upgrades);
        Ok(Self {
            blocks,
            fuels,
            upgrades,
        })
    }
}
