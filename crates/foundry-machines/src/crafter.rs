use std::collections::VecDeque;

use crate::admission::{AdmissionRejected, check_admission};
use crate::energy::{EnergyRouter, Simulation};
use crate::recipe::Recipe;
use crate::tier::TierState;

/// What one crafting tick did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CraftStep {
    Idle,
    /// The queued recipe can never run on this tier and was dropped.
    Rejected {
        recipe: String,
        reason: AdmissionRejected,
    },
    /// The running recipe no longer fits the current tier; it waits.
    Blocked {
        recipe: String,
        reason: AdmissionRejected,
    },
    /// Not enough energy for a full tick; nothing was drained.
    Stalled {
        recipe: String,
        needed: u64,
        available: u64,
    },
    Progress {
        recipe: String,
        done: u32,
        total: u32,
    },
    Finished {
        recipe: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Active {
    recipe: Recipe,
    progress: u32,
}

/// Runs queued recipes one at a time against a tier and an energy supply.
#[derive(Clone, Debug, Default)]
pub struct Crafter {
    queue: VecDeque<Recipe>,
    active: Option<Active>,
    completed: u64,
}

impl Crafter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, recipe: Recipe) {
        self.queue.push_back(recipe);
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Running recipe and its progress in ticks.
    pub fn active(&self) -> Option<(&Recipe, u32)> {
        self.active.as_ref().map(|a| (&a.recipe, a.progress))
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.queue.is_empty()
    }

    pub fn tick(&mut self, tier: &TierState, energy: &mut EnergyRouter) -> CraftStep {
        if self.active.is_none() {
            let Some(recipe) = self.queue.pop_front() else {
                return CraftStep::Idle;
            };
            if let Err(reason) = check_admission(recipe.eu, tier) {
                log::debug!(target: "craft", "rejected `{}`: {}", recipe.id, reason);
                return CraftStep::Rejected {
                    recipe: recipe.id,
                    reason,
                };
            }
            log::debug!(target: "craft", "started `{}` ({} ticks at {}/t)", recipe.id, recipe.duration, recipe.eu);
            self.active = Some(Active {
                recipe,
                progress: 0,
            });
        }
        let Some(active) = self.active.as_mut() else {
            return CraftStep::Idle;
        };
        let recipe = &active.recipe;
        if let Err(reason) = check_admission(recipe.eu, tier) {
            return CraftStep::Blocked {
                recipe: recipe.id.clone(),
                reason,
            };
        }
        let available = energy.drain(recipe.eu, Simulation::Simulate);
        if available < recipe.eu {
            log::trace!(target: "craft", "`{}` stalled: {available}/{}", recipe.id, recipe.eu);
            return CraftStep::Stalled {
                recipe: recipe.id.clone(),
                needed: recipe.eu,
                available,
            };
        }
        energy.drain(recipe.eu, Simulation::Act);
        active.progress += 1;
        if active.progress >= recipe.duration {
            let id = recipe.id.clone();
            self.active = None;
            self.completed += 1;
            log::info!(target: "craft", "finished `{id}`");
            return CraftStep::Finished { recipe: id };
        }
        CraftStep::Progress {
            recipe: recipe.id.clone(),
            done: active.progress,
            total: recipe.duration,
        }
    }
}
