//! Multiblock shape templates and matching them against a grid.
#![forbid(unsafe_code)]

pub mod matcher;
pub mod member;
pub mod template;

pub use matcher::{
    MatchFailure, MatchResult, MatchedHatch, ShapeMatcher, StructureMatch, WorldView, try_match,
};
pub use member::{CellContent, MemberRequirement};
pub use template::{ShapeTemplate, ShapeTemplateBuilder, TemplateEntry, TemplateError};

use foundry_blocks::BlockId;
use std::collections::BTreeSet;

/// Blocks whose presence in a matched shape decides its tier.
pub type TierBlocks = BTreeSet<BlockId>;
