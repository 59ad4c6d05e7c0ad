//! Hand-held powered tools.
#![forbid(unsafe_code)]

pub mod drill;

pub use drill::{DrillTooltip, DrillUser, Fluid, Hotbar, SteamDrill};
