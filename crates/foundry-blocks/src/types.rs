use serde::{Deserialize, Serialize};

pub type BlockId = u16;

/// Throughput envelope granted by a coil block when it forms part of a structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoilSpec {
    /// Highest per-tick rate this coil carries, whatever the upgrades.
    pub base_rate: u64,
    /// Structure ceiling before upgrades are added on top. May sit below
    /// `base_rate`; upgrades close the gap.
    pub max_rate: u64,
}
