use core::fmt;

use foundry_blocks::{BlockId, HatchFlags};

/// What a single template cell requires of the world.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MemberRequirement {
    Exact(BlockId),
    /// Sorted, deduplicated.
    AnyOf(Vec<BlockId>),
    /// A hatch exposing at least one of the flags.
    Hatch(HatchFlags),
    /// `member`, or a hatch exposing at least one of `hatches` in its place.
    WithHatch {
        member: Box<MemberRequirement>,
        hatches: HatchFlags,
    },
    /// Nothing may occupy the cell.
    Empty,
    DontCare,
}

/// The slice of a cell the matcher looks at.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CellContent {
    pub block: Option<BlockId>,
    pub hatch: Option<HatchFlags>,
}

impl MemberRequirement {
    pub fn any_of(ids: impl IntoIterator<Item = BlockId>) -> Self {
        let mut v: Vec<BlockId> = ids.into_iter().collect();
        v.sort_unstable();
        v.dedup();
        MemberRequirement::AnyOf(v)
    }

    /// Let a hatch stand in for this member. `None` or empty flags leave it unchanged.
    pub fn or_hatch(self, hatches: Option<HatchFlags>) -> Self {
        match hatches {
            Some(h) if !h.is_empty() => MemberRequirement::WithHatch {
                member: Box::new(self),
                hatches: h,
            },
            _ => self,
        }
    }

    pub fn matches(&self, cell: &CellContent) -> bool {
        match self {
            MemberRequirement::Exact(id) => cell.block == Some(*id),
            MemberRequirement::AnyOf(ids) => cell
                .block
                .is_some_and(|b| ids.binary_search(&b).is_ok()),
            MemberRequirement::Hatch(allowed) => hatch_fits(cell, *allowed),
            MemberRequirement::WithHatch { member, hatches } => {
                hatch_fits(cell, *hatches) || member.matches(cell)
            }
            MemberRequirement::Empty => cell.block.is_none(),
            MemberRequirement::DontCare => true,
        }
    }

    /// Flags under which the cell joins the structure as a hatch, if it does.
    pub fn hatch_role(&self, cell: &CellContent) -> Option<HatchFlags> {
        match self {
            MemberRequirement::Hatch(allowed)
            | MemberRequirement::WithHatch {
                hatches: allowed, ..
            } if hatch_fits(cell, *allowed) => cell.hatch,
            _ => None,
        }
    }

    /// True when a match at this cell was decided by block identity.
    pub fn constrains_block(&self) -> bool {
        match self {
            MemberRequirement::Exact(_) | MemberRequirement::AnyOf(_) => true,
            MemberRequirement::WithHatch { member, .. } => member.constrains_block(),
            _ => false,
        }
    }
}

#[inline]
fn hatch_fits(cell: &CellContent, allowed: HatchFlags) -> bool {
    cell.hatch.is_some_and(|h| h.intersects(allowed))
}

impl fmt::Display for MemberRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRequirement::Exact(id) => write!(f, "block #{id}"),
            MemberRequirement::AnyOf(ids) => write!(f, "one of {ids:?}"),
            MemberRequirement::Hatch(h) => write!(f, "hatch {h:?}"),
            MemberRequirement::WithHatch { member, hatches } => {
                write!(f, "{member} or hatch {hatches:?}")
            }
            MemberRequirement::Empty => f.write_str("empty"),
            MemberRequirement::DontCare => f.write_str("anything"),
        }
    }
}
