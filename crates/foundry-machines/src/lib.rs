//! Tiered crafting machines built on matched structures.
//!
//! ```text
//! BlastFurnace (furnace.rs)
//!   ├── ShapeMatcher        (foundry-structures) ← re-match on change
//!   ├── TierTable/TierState (tier.rs)            ← weakest coil + upgrades
//!   ├── EnergyRouter        (energy.rs)          ← drains hatches in order
//!   └── Crafter             (crafter.rs)         ← admission, progress
//! ```
#![forbid(unsafe_code)]

pub mod admission;
pub mod crafter;
pub mod energy;
pub mod furnace;
pub mod recipe;
pub mod tags;
pub mod tier;
pub mod upgrade;

pub use admission::{AdmissionRejected, check_admission, is_admissible};
pub use crafter::{CraftStep, Crafter};
pub use energy::{
    EnergyBuffer, EnergyRouter, HatchEndpoints, ResourceEndpoint, SharedEndpoint, Simulation,
};
pub use furnace::{BlastFurnace, FormError, Formed, FurnaceState, blast_furnace_template};
pub use recipe::{Recipe, RecipeBook, RecipeError};
pub use tags::{TagRecord, TagValue};
pub use tier::{TierState, TierTable};
pub use upgrade::UpgradeComponent;

/// Outcome of a player using an item on a machine or tool.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UseOutcome {
    Accepted,
    Pass,
}

impl UseOutcome {
    #[inline]
    pub fn is_accepted(self) -> bool {
        matches!(self, UseOutcome::Accepted)
    }
}
