//! Steam drill: a tool that burns hotbar fuel and boils its water tank.
//!
//! State lives in the drill's [`TagRecord`]:
//! - `water`: remaining ticks of water, [`FULL_WATER`] when full.
//! - `burnTicks`: remaining burn ticks of the current fuel item.

use std::sync::Arc;

use foundry_blocks::{FuelRegistry, ItemStack};
use foundry_machines::{Simulation, TagRecord, UseOutcome};

pub const FULL_WATER: i64 = 18_000;
pub const HOTBAR_SIZE: usize = 9;
pub const MINING_LEVEL: u32 = 2;
pub const MINING_SPEED: f32 = 4.0;
pub const BREAK_RADIUS: u32 = 1;
pub const TICKS_PER_SECOND: i64 = 20;

const TAG_WATER: &str = "water";
const TAG_BURN: &str = "burnTicks";

pub type Hotbar = [Option<ItemStack>; HOTBAR_SIZE];

/// Fluid under the cursor when the drill is used.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fluid {
    Water,
    FlowingWater,
    Lava,
}

/// The player holding the drill.
pub struct DrillUser<'a> {
    pub hotbar: &'a mut Hotbar,
    /// Hotbar index holding this drill, if it is on the hotbar at all.
    pub drill_slot: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DrillTooltip {
    pub water_percent: i64,
    /// Present only while fuel is burning.
    pub seconds_left: Option<i64>,
}

#[derive(Clone, Debug)]
pub struct SteamDrill {
    fuels: Arc<FuelRegistry>,
}

impl SteamDrill {
    pub fn new(fuels: Arc<FuelRegistry>) -> Self {
        Self { fuels }
    }

    /// Use on a fluid source: water refills the tank.
    pub fn fill_water(&self, tags: &mut TagRecord, target: Option<Fluid>) -> UseOutcome {
        match target {
            Some(Fluid::Water | Fluid::FlowingWater) => {
                tags.put_int(TAG_WATER, FULL_WATER);
                UseOutcome::Accepted
            }
            _ => UseOutcome::Pass,
        }
    }

    /// Called every tick while the drill sits in an inventory.
    pub fn inventory_tick(&self, tags: &mut TagRecord) {
        let burn = tags.get_int(TAG_BURN);
        if burn > 0 {
            tags.put_int(TAG_BURN, burn - 1);
            let water = tags.get_int(TAG_WATER);
            tags.put_int(TAG_WATER, (water - 1).max(0));
        }
    }

    pub fn can_mine(&self, tags: &TagRecord, user: Option<&mut DrillUser<'_>>) -> bool {
        if tags.get_int(TAG_WATER) <= 0 {
            return false;
        }
        tags.get_int(TAG_BURN) > 0 || self.consume_fuel(user, Simulation::Simulate) > 0
    }

    /// After a block breaks: light new fuel if the old one ran out.
    pub fn post_mine(&self, tags: &mut TagRecord, user: Option<&mut DrillUser<'_>>) {
        if tags.get_int(TAG_WATER) > 0 && tags.get_int(TAG_BURN) == 0 {
            let burn = self.consume_fuel(user, Simulation::Act);
            tags.put_int(TAG_BURN, burn as i64);
        }
    }

    /// Burn ticks of the first fuel next to the drill, left slot first.
    /// Acting takes one item and swaps in its remainder, if it has one.
    pub fn consume_fuel(&self, user: Option<&mut DrillUser<'_>>, simulation: Simulation) -> u32 {
        let Some(user) = user else {
            return 0;
        };
        let Some(drill) = user.drill_slot.filter(|s| *s < HOTBAR_SIZE) else {
            return 0;
        };
        let neighbours = [drill.checked_sub(1), Some(drill + 1)];
        for slot in neighbours.into_iter().flatten().filter(|s| *s < HOTBAR_SIZE) {
            let Some(stack) = user.hotbar[slot].as_mut().filter(|s| !s.is_empty()) else {
                continue;
            };
            let Some(burn) = self.fuels.burn_ticks_for(&stack.item).filter(|b| *b > 0) else {
                continue;
            };
            if simulation.is_acting() {
                log::debug!(target: "drill", "burning `{}` from slot {slot} for {burn} ticks", stack.item);
                stack.decrement(1);
                if let Some(r) = self.fuels.remainder_for(&stack.item) {
                    user.hotbar[slot] = Some(ItemStack::new(r, 1));
                } else if stack.is_empty() {
                    user.hotbar[slot] = None;
                }
            }
            return burn;
        }
        0
    }

    pub fn mining_level(&self, tags: &TagRecord, effective: bool, user: Option<&mut DrillUser<'_>>) -> u32 {
        if effective && self.can_mine(tags, user) {
            MINING_LEVEL
        } else {
            0
        }
    }

    pub fn mining_speed(&self, tags: &TagRecord, effective: bool, user: Option<&mut DrillUser<'_>>) -> f32 {
        if effective && self.can_mine(tags, user) {
            MINING_SPEED
        } else {
            1.0
        }
    }

    #[inline]
    pub fn radius(&self) -> u32 {
        BREAK_RADIUS
    }

    pub fn tooltip(&self, tags: &TagRecord) -> Option<DrillTooltip> {
        if tags.is_empty() {
            return None;
        }
        let burn = tags.get_int(TAG_BURN);
        Some(DrillTooltip {
            water_percent: tags.get_int(TAG_WATER) * 100 / FULL_WATER,
            seconds_left: (burn > 0).then_some(burn / TICKS_PER_SECOND),
        })
    }
}
