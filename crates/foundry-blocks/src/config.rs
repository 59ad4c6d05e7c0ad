use serde::Deserialize;
use std::collections::HashMap;

use crate::hatch::HatchKind;
use crate::types::CoilSpec;

// Top-level content file (blocks.toml)
#[derive(Deserialize, Debug, Default)]
pub struct ContentConfig {
    #[serde(default)]
    pub blocks: Vec<BlockDef>,
    #[serde(default)]
    pub fuels: HashMap<String, FuelEntry>,
    // upgrade item name -> bonus added to a structure's max rate per item
    #[serde(default)]
    pub upgrades: HashMap<String, u64>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    // Present on hatch blocks; decides which structure slots accept them
    #[serde(default)]
    pub hatch: Option<HatchKind>,
    // Present on tier-defining blocks
    #[serde(default)]
    pub coil: Option<CoilSpec>,
    // Energy buffer size for energy hatches
    #[serde(default)]
    pub capacity: Option<u64>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum FuelEntry {
    // Simple: coal = 1600
    Ticks(u32),
    // Detailed: lava_bucket = { burn_ticks = 20000, remainder = "bucket" }
    Detail {
        burn_ticks: u32,
        #[serde(default)]
        remainder: Option<String>,
    },
}
