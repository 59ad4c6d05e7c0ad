use core::fmt;

use serde::{Deserialize, Serialize};

/// Role a hatch block plays once it is part of a formed structure.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HatchKind {
    ItemInput,
    ItemOutput,
    FluidInput,
    FluidOutput,
    EnergyInput,
    EnergyOutput,
}

impl HatchKind {
    pub const ALL: [HatchKind; 6] = [
        HatchKind::ItemInput,
        HatchKind::ItemOutput,
        HatchKind::FluidInput,
        HatchKind::FluidOutput,
        HatchKind::EnergyInput,
        HatchKind::EnergyOutput,
    ];

    #[inline]
    fn bit(self) -> u8 {
        1 << (self as u8)
    }

    pub fn name(self) -> &'static str {
        match self {
            HatchKind::ItemInput => "item_input",
            HatchKind::ItemOutput => "item_output",
            HatchKind::FluidInput => "fluid_input",
            HatchKind::FluidOutput => "fluid_output",
            HatchKind::EnergyInput => "energy_input",
            HatchKind::EnergyOutput => "energy_output",
        }
    }
}

/// Bitset over [`HatchKind`] (one bit per kind, in declaration order).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct HatchFlags(u8);

impl HatchFlags {
    pub const NONE: HatchFlags = HatchFlags(0);

    #[inline]
    pub fn of(kinds: &[HatchKind]) -> Self {
        kinds.iter().fold(Self::NONE, |acc, k| acc.with(*k))
    }

    #[inline]
    pub fn single(kind: HatchKind) -> Self {
        HatchFlags(kind.bit())
    }

    #[inline]
    pub fn with(self, kind: HatchKind) -> Self {
        HatchFlags(self.0 | kind.bit())
    }

    #[inline]
    pub fn contains(self, kind: HatchKind) -> bool {
        self.0 & kind.bit() != 0
    }

    #[inline]
    pub fn intersects(self, other: HatchFlags) -> bool {
        self.0 & other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = HatchKind> {
        HatchKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl From<HatchKind> for HatchFlags {
    fn from(kind: HatchKind) -> Self {
        HatchFlags::single(kind)
    }
}

impl fmt::Debug for HatchFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter().map(HatchKind::name)).finish()
    }
}
