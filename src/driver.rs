//! Builds a grid from a scenario and steps it tick by tick.

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;

use foundry_blocks::{BlockId, Content, ItemStack};
use foundry_geom::{BlockPos, Facing};
use foundry_machines::{
    BlastFurnace, CraftStep, FurnaceState, RecipeBook, ResourceEndpoint, TagRecord, TierTable,
    blast_furnace_template,
};
use foundry_tools::drill::TICKS_PER_SECOND;
use foundry_tools::{DrillUser, Fluid, Hotbar, SteamDrill};
use foundry_world::GridWorld;

use crate::scenario::{DrillSection, Edit, Scenario};

#[derive(Debug, Default)]
pub struct RunReport {
    pub ticks: u64,
    pub finished: Vec<String>,
    pub rejected: Vec<String>,
    pub stalled_ticks: u64,
    pub unformed_ticks: u64,
}

pub struct Driver {
    world: GridWorld,
    furnace: Option<BlastFurnace>,
    // map of tick -> edits applied at its start
    edits: BTreeMap<u64, Vec<Edit>>,
    now: u64,
    report: RunReport,
}

impl Driver {
    pub fn from_scenario(
        content: &Content,
        recipes: &RecipeBook,
        scenario: &Scenario,
    ) -> Result<Self, Box<dyn Error>> {
        let mut world = GridWorld::new(Arc::new(content.blocks.clone()));
        for f in &scenario.fill {
            let id = block_id(&world, &f.block)?;
            world.fill(f.from.into(), f.to.into(), id);
        }
        for p in &scenario.place {
            world.set_by_name(p.pos.into(), &p.block)?;
        }
        for pos in &scenario.clear {
            world.remove((*pos).into());
        }
        for c in &scenario.charge {
            let accepted = world.charge(c.pos.into(), c.amount)?;
            if accepted < c.amount {
                log::warn!(target: "energy", "hatch at {} only took {accepted}/{}", BlockPos::from(c.pos), c.amount);
            }
        }
        // Setup edits are not interesting to the furnace
        world.drain_changes();

        let furnace = match &scenario.furnace {
            None => None,
            Some(section) => {
                let facing = Facing::from_name(&section.facing)
                    .ok_or_else(|| format!("unknown facing `{}`", section.facing))?;
                let casing = block_id(&world, &section.casing)?;
                let tiers = TierTable::from_registry(&content.blocks);
                let template = blast_furnace_template(casing, tiers.coil_ids())?;
                let mut furnace = BlastFurnace::new(
                    Arc::new(template),
                    Arc::new(tiers),
                    Arc::new(content.upgrades.clone()),
                    section.origin.into(),
                    facing,
                );
                if let Some(up) = &section.upgrade {
                    let mut held = ItemStack::new(up.item.clone(), up.count);
                    if !furnace.on_use(&mut held).is_accepted() {
                        return Err(format!("`{}` is not an upgrade", up.item).into());
                    }
                }
                for id in &section.recipes {
                    let recipe = recipes
                        .get(id)
                        .ok_or_else(|| format!("unknown recipe `{id}`"))?;
                    furnace.enqueue(recipe.clone());
                }
                Some(furnace)
            }
        };

        let mut edits: BTreeMap<u64, Vec<Edit>> = BTreeMap::new();
        for e in &scenario.edits {
            if let Some(name) = &e.block {
                block_id(&world, name)?;
            }
            edits.entry(e.tick).or_default().push(e.clone());
        }

        Ok(Self {
            world,
            furnace,
            edits,
            now: 0,
            report: RunReport::default(),
        })
    }

    pub fn world(&self) -> &GridWorld {
        &self.world
    }

    pub fn furnace(&self) -> Option<&BlastFurnace> {
        self.furnace.as_ref()
    }

    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// Apply due edits, forward them to the furnace, then step it.
    pub fn tick(&mut self) -> Result<Option<CraftStep>, Box<dyn Error>> {
        if let Some(due) = self.edits.remove(&self.now) {
            for e in due {
                let pos = BlockPos::from(e.pos);
                match &e.block {
                    Some(name) => {
                        self.world.set_by_name(pos, name)?;
                    }
                    None => {
                        self.world.remove(pos);
                    }
                }
                log::debug!("tick {}: edited {pos}", self.now);
            }
        }
        let changes = self.world.drain_changes();
        let step = match self.furnace.as_mut() {
            None => None,
            Some(furnace) => {
                for pos in changes {
                    furnace.on_block_changed(pos);
                }
                furnace.tick(&self.world)
            }
        };
        match &step {
            Some(CraftStep::Finished { recipe }) => self.report.finished.push(recipe.clone()),
            Some(CraftStep::Rejected { recipe, reason }) => {
                log::warn!(target: "craft", "dropped `{recipe}`: {reason}");
                self.report.rejected.push(recipe.clone());
            }
            Some(CraftStep::Stalled { .. }) => self.report.stalled_ticks += 1,
            None if self.furnace.is_some() => self.report.unformed_ticks += 1,
            _ => {}
        }
        self.now += 1;
        self.report.ticks = self.now;
        Ok(step)
    }

    /// Energy left in every energy hatch of the formed furnace.
    pub fn stored_energy(&self) -> Vec<(BlockPos, u64)> {
        let Some(FurnaceState::Formed(formed)) = self.furnace.as_ref().map(|f| f.state()) else {
            return Vec::new();
        };
        formed
            .hatches
            .iter()
            .filter_map(|h| {
                self.world
                    .energy_buffer(h.pos)
                    .map(|b| (h.pos, b.borrow().available()))
            })
            .collect()
    }
}

fn block_id(world: &GridWorld, name: &str) -> Result<BlockId, Box<dyn Error>> {
    world
        .registry()
        .id_by_name(name)
        .ok_or_else(|| format!("unknown block `{name}`").into())
}

#[derive(Debug, Default)]
pub struct DrillReport {
    pub mined: u64,
    pub dry_swings: u64,
    pub water: i64,
    pub burn_ticks: i64,
    pub fuel_left: u32,
}

/// Hold the drill in slot 1 with fuel to its left and swing every
/// `mine_every` ticks.
pub fn run_drill(drill: &SteamDrill, section: &DrillSection, ticks: u64) -> DrillReport {
    let mut hotbar: Hotbar = Default::default();
    hotbar[0] = Some(ItemStack::new(section.fuel.clone(), section.fuel_count));
    let mut tags = TagRecord::new();
    if section.fill_water {
        drill.fill_water(&mut tags, Some(Fluid::Water));
    }
    let mut report = DrillReport::default();
    let interval = section.mine_every.max(1);
    for t in 0..ticks {
        drill.inventory_tick(&mut tags);
        if t % interval != 0 {
            continue;
        }
        let mut user = DrillUser {
            hotbar: &mut hotbar,
            drill_slot: Some(1),
        };
        if drill.can_mine(&tags, Some(&mut user)) {
            drill.post_mine(&mut tags, Some(&mut user));
            report.mined += 1;
        } else {
            report.dry_swings += 1;
        }
        if t % (TICKS_PER_SECOND as u64 * 60) == 0 {
            if let Some(tip) = drill.tooltip(&tags) {
                log::debug!(target: "drill", "tick {t}: water {}%, {:?}s left", tip.water_percent, tip.seconds_left);
            }
        }
    }
    report.water = tags.get_int("water");
    report.burn_ticks = tags.get_int("burnTicks");
    report.fuel_left = hotbar
        .iter()
        .flatten()
        .filter(|s| s.item == section.fuel)
        .map(|s| s.count)
        .sum();
    report
}
