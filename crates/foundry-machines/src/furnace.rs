//! Electric blast furnace: a coil-tiered multiblock that runs recipes off
//! its energy hatches.

use core::fmt;
use std::collections::BTreeSet;
use std::sync::Arc;

use foundry_blocks::{BlockId, HatchFlags, HatchKind, ItemStack, UpgradeTable};
use foundry_geom::{BlockPos, Facing};
use foundry_structures::{
    MatchFailure, MatchedHatch, MemberRequirement, ShapeMatcher, ShapeTemplate, TemplateError,
    WorldView,
};
use thiserror::Error;

use crate::UseOutcome;
use crate::crafter::{CraftStep, Crafter};
use crate::energy::{EnergyRouter, HatchEndpoints};
use crate::recipe::Recipe;
use crate::tags::TagRecord;
use crate::tier::{TierState, TierTable};
use crate::upgrade::UpgradeComponent;

/// Hatch kinds accepted in place of casing.
pub const FURNACE_HATCHES: [HatchKind; 5] = [
    HatchKind::ItemInput,
    HatchKind::ItemOutput,
    HatchKind::FluidInput,
    HatchKind::FluidOutput,
    HatchKind::EnergyInput,
];

const TAG_COILS: &str = "coils";

/// Casing floor and roof that may hold hatches, with a two-high hollow coil
/// ring between them.
pub fn blast_furnace_template(
    casing: BlockId,
    coils: impl IntoIterator<Item = BlockId>,
) -> Result<ShapeTemplate, TemplateError> {
    let hatches = Some(HatchFlags::of(&FURNACE_HATCHES));
    let coil = MemberRequirement::any_of(coils);
    let casing = MemberRequirement::Exact(casing);
    ShapeTemplate::builder("electric_blast_furnace")
        .layer_3x3(0, casing.clone(), false, hatches)
        .layer_3x3(1, coil.clone(), true, None)
        .layer_3x3(2, coil, true, None)
        .layer_3x3(3, casing, false, hatches)
        .build()
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Mismatch(#[from] MatchFailure),
    #[error("no known coil in the structure")]
    MissingTier,
    #[error("not checked yet")]
    Pending,
}

#[derive(Clone, Debug)]
pub struct Formed {
    pub tier: TierState,
    /// Template order.
    pub hatches: Vec<MatchedHatch>,
    pub discovered: BTreeSet<BlockId>,
    energy: EnergyRouter,
}

impl Formed {
    pub fn energy(&self) -> &EnergyRouter {
        &self.energy
    }
}

#[derive(Clone, Debug)]
pub enum FurnaceState {
    Unformed(FormError),
    Formed(Formed),
}

impl fmt::Display for FurnaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FurnaceState::Formed(formed) => write!(
                f,
                "formed: coil #{}, {}/t base, {}/t max, {} hatch(es)",
                formed.tier.coil,
                formed.tier.base_rate,
                formed.tier.max_rate,
                formed.hatches.len()
            ),
            FurnaceState::Unformed(e) => write!(f, "unformed: {e}"),
        }
    }
}

pub struct BlastFurnace {
    matcher: ShapeMatcher,
    tiers: Arc<TierTable>,
    upgrade_table: Arc<UpgradeTable>,
    upgrade: UpgradeComponent,
    crafter: Crafter,
    state: FurnaceState,
}

impl BlastFurnace {
    pub fn new(
        template: Arc<ShapeTemplate>,
        tiers: Arc<TierTable>,
        upgrade_table: Arc<UpgradeTable>,
        origin: BlockPos,
        facing: Facing,
    ) -> Self {
        let tier_blocks = Arc::new(tiers.tier_blocks());
        Self {
            matcher: ShapeMatcher::new(template, tier_blocks, origin, facing),
            tiers,
            upgrade_table,
            upgrade: UpgradeComponent::new(),
            crafter: Crafter::new(),
            state: FurnaceState::Unformed(FormError::Pending),
        }
    }

    pub fn origin(&self) -> BlockPos {
        self.matcher.origin()
    }

    pub fn facing(&self) -> Facing {
        self.matcher.facing()
    }

    pub fn set_facing(&mut self, facing: Facing) {
        self.matcher.set_facing(facing);
    }

    /// Returns true when `pos` belongs to this furnace; it re-checks next tick.
    pub fn on_block_changed(&mut self, pos: BlockPos) -> bool {
        self.matcher.notify_changed(pos)
    }

    /// Re-match if something changed, then run one crafting step while formed.
    pub fn tick<W>(&mut self, world: &W) -> Option<CraftStep>
    where
        W: WorldView + HatchEndpoints + ?Sized,
    {
        if self.matcher.refresh(world) {
            self.rebuild(world);
        }
        match &mut self.state {
            FurnaceState::Formed(formed) => Some(self.crafter.tick(&formed.tier, &mut formed.energy)),
            FurnaceState::Unformed(_) => None,
        }
    }

    fn rebuild<W>(&mut self, world: &W)
    where
        W: WorldView + HatchEndpoints + ?Sized,
    {
        let was_formed = self.is_formed();
        let next = match self.matcher.last() {
            None => FurnaceState::Unformed(FormError::Pending),
            Some(Err(e)) => FurnaceState::Unformed(e.clone().into()),
            Some(Ok(m)) => {
                let bonus = self.upgrade.add_max_rate(&self.upgrade_table);
                match self.tiers.resolve(&m.tier_blocks, bonus) {
                    None => FurnaceState::Unformed(FormError::MissingTier),
                    Some(tier) => {
                        let mut endpoints = Vec::new();
                        for h in &m.hatches {
                            if h.flags.contains(HatchKind::EnergyInput) {
                                world.energy_inputs_at(h.pos, &mut endpoints);
                            }
                        }
                        FurnaceState::Formed(Formed {
                            tier,
                            hatches: m.hatches.clone(),
                            discovered: m.tier_blocks.clone(),
                            energy: EnergyRouter::new(endpoints),
                        })
                    }
                }
            }
        };
        match (&next, was_formed) {
            (FurnaceState::Formed(f), _) => log::info!(
                target: "structure",
                "blast furnace at {} formed: max {}/t, {} energy input(s)",
                self.origin(),
                f.tier.max_rate,
                f.energy.len()
            ),
            (FurnaceState::Unformed(e), true) => {
                log::info!(target: "structure", "blast furnace at {} broke: {}", self.origin(), e)
            }
            (FurnaceState::Unformed(_), false) => {}
        }
        self.state = next;
    }

    pub fn state(&self) -> &FurnaceState {
        &self.state
    }

    pub fn is_formed(&self) -> bool {
        matches!(self.state, FurnaceState::Formed(_))
    }

    pub fn tier(&self) -> Option<&TierState> {
        match &self.state {
            FurnaceState::Formed(f) => Some(&f.tier),
            FurnaceState::Unformed(_) => None,
        }
    }

    pub fn enqueue(&mut self, recipe: Recipe) {
        self.crafter.enqueue(recipe);
    }

    pub fn crafter(&self) -> &Crafter {
        &self.crafter
    }

    pub fn upgrade(&self) -> &UpgradeComponent {
        &self.upgrade
    }

    /// Use a held item on the controller. Accepted upgrades apply at once;
    /// anything else passes with the held stack untouched.
    pub fn on_use(&mut self, held: &mut ItemStack) -> UseOutcome {
        let outcome = self.upgrade.on_use(held, &self.upgrade_table);
        if outcome.is_accepted() {
            let bonus = self.upgrade.add_max_rate(&self.upgrade_table);
            if let FurnaceState::Formed(f) = &mut self.state {
                if let Some(tier) = self.tiers.resolve(&f.discovered, bonus) {
                    f.tier = tier;
                }
            }
            log::debug!(target: "structure", "upgrade bonus now {bonus}/t");
        }
        outcome
    }

    /// Items left behind when the controller is removed.
    pub fn drops(&mut self) -> Vec<ItemStack> {
        self.upgrade.take_drop().into_iter().collect()
    }

    pub fn save(&self, tags: &mut TagRecord) {
        let coils = match &self.state {
            FurnaceState::Formed(f) => f.discovered.iter().map(|c| *c as i64).collect(),
            FurnaceState::Unformed(_) => Vec::new(),
        };
        tags.put_ints(TAG_COILS, coils);
        self.upgrade.write_tags(tags);
    }

    /// Restore persisted state. The shape is re-checked on the next tick.
    pub fn load(&mut self, tags: &TagRecord) {
        self.upgrade.read_tags(tags);
        self.matcher.invalidate();
    }
}
