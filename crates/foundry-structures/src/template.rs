//! Immutable, orientable shape templates.
//!
//! Templates are authored in the controller's frame with the controller at
//! the origin: +X to the controller's right, +Y up, +Z behind it. A template
//! stores the facing it was authored for (north unless told otherwise) and is
//! rotated on demand, so one template serves all four horizontal facings.

use std::collections::HashSet;

use foundry_blocks::HatchFlags;
use foundry_geom::{BlockPos, Facing};
use thiserror::Error;

use crate::member::MemberRequirement;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template `{template}`: cell {pos} is declared twice")]
    Collision { template: String, pos: BlockPos },
    #[error("template `{template}`: the controller cell cannot carry a requirement")]
    ControllerCell { template: String },
    #[error("template `{template}`: base facing {facing} is not horizontal")]
    VerticalFacing { template: String, facing: Facing },
    #[error("template `{0}` has no cells")]
    Empty(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateEntry {
    /// Position relative to the controller, in the template's authored frame.
    pub pos: BlockPos,
    pub requirement: MemberRequirement,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeTemplate {
    name: String,
    base_facing: Facing,
    entries: Vec<TemplateEntry>,
}

impl ShapeTemplate {
    pub fn builder(name: impl Into<String>) -> ShapeTemplateBuilder {
        ShapeTemplateBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_facing(&self) -> Facing {
        self.base_facing
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Absolute position of every entry for a controller at `origin` facing
    /// `facing`, in declaration order. `None` when `facing` is vertical.
    pub fn oriented(
        &self,
        origin: BlockPos,
        facing: Facing,
    ) -> Option<impl Iterator<Item = (BlockPos, &TemplateEntry)> + '_> {
        let turns = self.base_facing.turns_to(facing)?;
        Some(
            self.entries
                .iter()
                .map(move |e| (origin + e.pos.rotate_y_cw(turns), e)),
        )
    }

    /// Every absolute cell the template covers, controller included.
    pub fn footprint(&self, origin: BlockPos, facing: Facing) -> HashSet<BlockPos> {
        let mut out: HashSet<BlockPos> = match self.oriented(origin, facing) {
            Some(it) => it.map(|(p, _)| p).collect(),
            None => HashSet::new(),
        };
        out.insert(origin);
        out
    }

    pub fn hatch_slot_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| {
                matches!(
                    e.requirement,
                    MemberRequirement::Hatch(_) | MemberRequirement::WithHatch { .. }
                )
            })
            .count()
    }
}

/// Collects template cells; the first invalid declaration is reported by [`build`].
///
/// [`build`]: ShapeTemplateBuilder::build
pub struct ShapeTemplateBuilder {
    name: String,
    base_facing: Facing,
    entries: Vec<TemplateEntry>,
    seen: HashSet<BlockPos>,
    error: Option<TemplateError>,
}

impl ShapeTemplateBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_facing: Facing::North,
            entries: Vec::new(),
            seen: HashSet::new(),
            error: None,
        }
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        if !facing.is_horizontal() {
            self.fail(TemplateError::VerticalFacing {
                template: self.name.clone(),
                facing,
            });
        }
        self.base_facing = facing;
        self
    }

    pub fn add(mut self, pos: BlockPos, requirement: MemberRequirement) -> Self {
        self.push(pos, requirement);
        self
    }

    /// Nine cells x in [-1, 1], z in [0, 2] at height `y`. The controller cell
    /// is skipped; `hollow` leaves the centre (0, y, 1) unconstrained.
    pub fn layer_3x3(
        mut self,
        y: i32,
        member: MemberRequirement,
        hollow: bool,
        hatches: Option<HatchFlags>,
    ) -> Self {
        let req = member.or_hatch(hatches);
        for z in 0..=2 {
            for x in -1..=1 {
                let pos = BlockPos::new(x, y, z);
                if pos == BlockPos::ORIGIN || (hollow && x == 0 && z == 1) {
                    continue;
                }
                self.push(pos, req.clone());
            }
        }
        self
    }

    pub fn build(self) -> Result<ShapeTemplate, TemplateError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if self.entries.is_empty() {
            return Err(TemplateError::Empty(self.name));
        }
        Ok(ShapeTemplate {
            name: self.name,
            base_facing: self.base_facing,
            entries: self.entries,
        })
    }

    fn push(&mut self, pos: BlockPos, requirement: MemberRequirement) {
        if pos == BlockPos::ORIGIN {
            self.fail(TemplateError::ControllerCell {
                template: self.name.clone(),
            });
            return;
        }
        if !self.seen.insert(pos) {
            self.fail(TemplateError::Collision {
                template: self.name.clone(),
                pos,
            });
            return;
        }
        self.entries.push(TemplateEntry { pos, requirement });
    }

    fn fail(&mut self, err: TemplateError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}
