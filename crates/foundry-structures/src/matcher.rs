use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use foundry_blocks::{BlockId, HatchFlags};
use foundry_geom::{BlockPos, Facing};
use thiserror::Error;

use crate::TierBlocks;
use crate::member::{CellContent, MemberRequirement};
use crate::template::ShapeTemplate;

/// Read-only access to the grid, supplied by the host.
pub trait WorldView {
    fn block_at(&self, pos: BlockPos) -> Option<BlockId>;
    /// Hatch flags of the block at `pos`, if that block is a hatch.
    fn hatch_at(&self, pos: BlockPos) -> Option<HatchFlags>;

    #[inline]
    fn cell(&self, pos: BlockPos) -> CellContent {
        CellContent {
            block: self.block_at(pos),
            hatch: self.hatch_at(pos),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatchedHatch {
    pub pos: BlockPos,
    pub flags: HatchFlags,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructureMatch {
    pub origin: BlockPos,
    pub facing: Facing,
    /// Template declaration order.
    pub hatches: Vec<MatchedHatch>,
    pub tier_blocks: BTreeSet<BlockId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchFailure {
    #[error("cell {pos} (relative {relative}) is not {requirement}")]
    Mismatch {
        pos: BlockPos,
        relative: BlockPos,
        requirement: MemberRequirement,
        found: Option<BlockId>,
    },
    #[error("{0} is not a valid controller facing")]
    UnsupportedFacing(Facing),
}

pub type MatchResult = Result<StructureMatch, MatchFailure>;

/// Walk `template` for a controller at `origin` facing `facing`.
///
/// Stops at the first cell that fails its requirement. Never writes to the world.
pub fn try_match<W: WorldView + ?Sized>(
    world: &W,
    origin: BlockPos,
    facing: Facing,
    template: &ShapeTemplate,
    tier_blocks: &TierBlocks,
) -> MatchResult {
    let cells = template
        .oriented(origin, facing)
        .ok_or(MatchFailure::UnsupportedFacing(facing))?;
    let mut hatches = Vec::new();
    let mut tiers = BTreeSet::new();
    for (pos, entry) in cells {
        let cell = world.cell(pos);
        if !entry.requirement.matches(&cell) {
            return Err(MatchFailure::Mismatch {
                pos,
                relative: entry.pos,
                requirement: entry.requirement.clone(),
                found: cell.block,
            });
        }
        if let Some(flags) = entry.requirement.hatch_role(&cell) {
            hatches.push(MatchedHatch { pos, flags });
        } else if entry.requirement.constrains_block() {
            if let Some(b) = cell.block.filter(|b| tier_blocks.contains(b)) {
                tiers.insert(b);
            }
        }
    }
    Ok(StructureMatch {
        origin,
        facing,
        hatches,
        tier_blocks: tiers,
    })
}

/// Keeps the last match for one controller and re-runs it only after a
/// change inside the footprint (or an explicit invalidation).
#[derive(Clone, Debug)]
pub struct ShapeMatcher {
    template: Arc<ShapeTemplate>,
    tier_blocks: Arc<TierBlocks>,
    origin: BlockPos,
    facing: Facing,
    footprint: HashSet<BlockPos>,
    dirty: bool,
    last: Option<MatchResult>,
}

impl ShapeMatcher {
    pub fn new(
        template: Arc<ShapeTemplate>,
        tier_blocks: Arc<TierBlocks>,
        origin: BlockPos,
        facing: Facing,
    ) -> Self {
        let footprint = template.footprint(origin, facing);
        Self {
            template,
            tier_blocks,
            origin,
            facing,
            footprint,
            dirty: true,
            last: None,
        }
    }

    pub fn template(&self) -> &ShapeTemplate {
        &self.template
    }

    pub fn origin(&self) -> BlockPos {
        self.origin
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Turn the controller; the footprint moves with it.
    pub fn set_facing(&mut self, facing: Facing) {
        if facing != self.facing {
            self.facing = facing;
            self.footprint = self.template.footprint(self.origin, facing);
            self.dirty = true;
        }
    }

    /// Neighbour-change notification. Returns true if `pos` is part of this shape.
    pub fn notify_changed(&mut self, pos: BlockPos) -> bool {
        let hit = self.footprint.contains(&pos);
        if hit {
            self.dirty = true;
        }
        hit
    }

    /// Re-match if dirty. Returns true when a fresh result was computed.
    pub fn refresh<W: WorldView + ?Sized>(&mut self, world: &W) -> bool {
        if !self.dirty {
            return false;
        }
        let result = try_match(
            world,
            self.origin,
            self.facing,
            &self.template,
            &self.tier_blocks,
        );
        match &result {
            Ok(m) => log::debug!(
                target: "structure",
                "`{}` at {} matched with {} hatch(es)",
                self.template.name(),
                self.origin,
                m.hatches.len()
            ),
            Err(e) => log::debug!(
                target: "structure",
                "`{}` at {} failed: {}",
                self.template.name(),
                self.origin,
                e
            ),
        }
        self.last = Some(result);
        self.dirty = false;
        true
    }

    pub fn last(&self) -> Option<&MatchResult> {
        self.last.as_ref()
    }

    pub fn is_matched(&self) -> bool {
        matches!(self.last, Some(Ok(_)))
    }
}
