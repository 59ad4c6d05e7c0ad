use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use super::config::BlockDef;
use super::hatch::{HatchFlags, HatchKind};
use super::types::{BlockId, CoilSpec};

pub const DEFAULT_HATCH_CAPACITY: u64 = 4096;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid content table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("block `{0}` is defined twice")]
    DuplicateName(String),
    #[error("block id {id} is claimed by both `{first}` and `{second}`")]
    DuplicateId {
        id: BlockId,
        first: String,
        second: String,
    },
    #[error("coil `{name}` needs non-zero rates (base_rate {base_rate}, max_rate {max_rate})")]
    InvalidCoil {
        name: String,
        base_rate: u64,
        max_rate: u64,
    },
    #[error("block `{0}` cannot be both a hatch and a coil")]
    HatchCoil(String),
    #[error("fuel `{0}` must burn for at least one tick")]
    ZeroBurn(String),
    #[error("no block id left for `{0}`")]
    IdOverflow(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub hatch: Option<HatchKind>,
    pub coil: Option<CoilSpec>,
    pub capacity: u64,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            hatch: None,
            coil: None,
            capacity: 0,
        }
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.name.is_empty()
    }

    #[inline]
    pub fn hatch_flags(&self) -> Option<HatchFlags> {
        self.hatch.map(HatchFlags::single)
    }
}

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).filter(|t| !t.is_placeholder())
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: BlockId) -> &str {
        self.get(id).map(|t| t.name.as_str()).unwrap_or("?")
    }

    #[inline]
    pub fn hatch_kind(&self, id: BlockId) -> Option<HatchKind> {
        self.get(id).and_then(|t| t.hatch)
    }

    #[inline]
    pub fn coil(&self, id: BlockId) -> Option<CoilSpec> {
        self.get(id).and_then(|t| t.coil)
    }

    /// All tier-defining blocks, in id order.
    pub fn coils(&self) -> impl Iterator<Item = (BlockId, CoilSpec)> + '_ {
        self.blocks.iter().filter_map(|t| t.coil.map(|c| (t.id, c)))
    }

    pub fn from_configs(defs: Vec<BlockDef>) -> Result<Self, RegistryError> {
        let mut reg = BlockRegistry::new();
        for def in defs.into_iter() {
            if reg.by_name.contains_key(&def.name) {
                return Err(RegistryError::DuplicateName(def.name));
            }
            if let Some(c) = def.coil {
                if def.hatch.is_some() {
                    return Err(RegistryError::HatchCoil(def.name));
                }
                if c.base_rate == 0 || c.max_rate == 0 {
                    return Err(RegistryError::InvalidCoil {
                        name: def.name,
                        base_rate: c.base_rate,
                        max_rate: c.max_rate,
                    });
                }
            }
            let id = match def.id {
                Some(id) => id,
                None => match BlockId::try_from(reg.blocks.len()) {
                    Ok(id) => id,
                    Err(_) => return Err(RegistryError::IdOverflow(def.name)),
                },
            };
            if let Some(prev) = reg.get(id) {
                return Err(RegistryError::DuplicateId {
                    id,
                    first: prev.name.clone(),
                    second: def.name,
                });
            }
            let capacity = match def.hatch {
                Some(HatchKind::EnergyInput) | Some(HatchKind::EnergyOutput) => {
                    def.capacity.unwrap_or(DEFAULT_HATCH_CAPACITY)
                }
                _ => def.capacity.unwrap_or(0),
            };
            let ty = BlockType {
                id,
                name: def.name,
                hatch: def.hatch,
                coil: def.coil,
                capacity,
            };
            while reg.blocks.len() <= id as usize {
                let next = reg.blocks.len() as BlockId;
                reg.blocks.push(BlockType::placeholder(next));
            }
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
        }
        Ok(reg)
    }
}
