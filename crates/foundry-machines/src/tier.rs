use std::collections::{BTreeMap, BTreeSet};

use foundry_blocks::{BlockId, BlockRegistry, CoilSpec};
use foundry_structures::TierBlocks;

/// Operating envelope of one formed structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TierState {
    /// Coil that set the envelope.
    pub coil: BlockId,
    /// Per-tick cap of the coil itself; upgrades never raise it.
    pub base_rate: u64,
    /// Structure ceiling plus upgrade bonus.
    pub max_rate: u64,
}

/// Coil -> envelope table, built once from the registry.
#[derive(Clone, Debug, Default)]
pub struct TierTable {
    coils: BTreeMap<BlockId, CoilSpec>,
}

impl TierTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registry(reg: &BlockRegistry) -> Self {
        Self {
            coils: reg.coils().collect(),
        }
    }

    pub fn with(mut self, coil: BlockId, spec: CoilSpec) -> Self {
        self.coils.insert(coil, spec);
        self
    }

    #[inline]
    pub fn get(&self, coil: BlockId) -> Option<CoilSpec> {
        self.coils.get(&coil).copied()
    }

    pub fn tier_blocks(&self) -> TierBlocks {
        self.coils.keys().copied().collect()
    }

    pub fn coil_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.coils.keys().copied()
    }

    /// Envelope for the coils found in a structure.
    ///
    /// With mixed coils the weakest one (lowest max, then lowest base) decides.
    /// `upgrade_bonus` is added to the max rate only, so a recipe above the
    /// bare ceiling runs once upgrades lift it, up to the coil's base cap.
    /// `None` if no discovered block is a known coil.
    pub fn resolve(&self, discovered: &BTreeSet<BlockId>, upgrade_bonus: u64) -> Option<TierState> {
        let (coil, spec) = discovered
            .iter()
            .filter_map(|id| self.get(*id).map(|s| (*id, s)))
            .min_by_key(|(id, s)| (s.max_rate, s.base_rate, *id))?;
        Some(TierState {
            coil,
            base_rate: spec.base_rate,
            max_rate: spec.max_rate.saturating_add(upgrade_bonus),
        })
    }
}
