use std::error::Error;
use std::path::Path;

use serde::Deserialize;

/// A world layout plus what to run in it.
#[derive(Clone, Debug, Deserialize)]
pub struct Scenario {
    #[serde(default)] pub fill: Vec<Fill>,
    #[serde(default)] pub place: Vec<Place>,
    #[serde(default)] pub clear: Vec<[i32; 3]>,
    #[serde(default)] pub charge: Vec<Charge>,
    #[serde(default)] pub furnace: Option<FurnaceSection>,
    // Edits applied at the start of the given tick
    #[serde(default)] pub edits: Vec<Edit>,
    #[serde(default)] pub drill: Option<DrillSection>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Fill { pub from: [i32; 3], pub to: [i32; 3], pub block: String }

#[derive(Clone, Debug, Deserialize)]
pub struct Place { pub pos: [i32; 3], pub block: String }

#[derive(Clone, Debug, Deserialize)]
pub struct Charge { pub pos: [i32; 3], pub amount: u64 }

#[derive(Clone, Debug, Deserialize)]
pub struct FurnaceSection {
    pub origin: [i32; 3],
    #[serde(default = "default_facing")] pub facing: String,
    #[serde(default = "default_casing")] pub casing: String,
    #[serde(default)] pub recipes: Vec<String>,
    #[serde(default)] pub upgrade: Option<UpgradeSection>,
}

fn default_facing() -> String { "north".to_string() }
fn default_casing() -> String { "heatproof_machine_casing".to_string() }

#[derive(Clone, Debug, Deserialize)]
pub struct UpgradeSection { pub item: String, #[serde(default = "default_upgrade_count")] pub count: u32 }

fn default_upgrade_count() -> u32 { 1 }

#[derive(Clone, Debug, Deserialize)]
pub struct Edit {
    pub tick: u64,
    pub pos: [i32; 3],
    // None removes the block
    #[serde(default)] pub block: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DrillSection {
    #[serde(default = "default_fuel")] pub fuel: String,
    #[serde(default = "default_fuel_count")] pub fuel_count: u32,
    #[serde(default = "default_mine_every")] pub mine_every: u64,
    #[serde(default = "default_true")] pub fill_water: bool,
}

fn default_fuel() -> String { "coal".to_string() }
fn default_fuel_count() -> u32 { 4 }
fn default_mine_every() -> u64 { 10 }
fn default_true() -> bool { true }

impl Default for DrillSection {
    fn default() -> Self {
        Self {
            fuel: default_fuel(),
            fuel_count: default_fuel_count(),
            mine_every: default_mine_every(),
            fill_water: true,
        }
    }
}

impl Scenario {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        let scenario = Self::from_toml_str(&s)
            .map_err(|e| format!("invalid scenario {}: {e}", path.display()))?;
        Ok(scenario)
    }
}
