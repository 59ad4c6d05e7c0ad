use std::collections::HashMap;

use serde::{Deserialize, Serialize};

pub const MAX_STACK: u32 = 64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn is(&self, item: &str) -> bool {
        self.count > 0 && self.item == item
    }

    pub fn decrement(&mut self, n: u32) {
        self.count = self.count.saturating_sub(n);
    }
}

/// Upgrade items and the bonus each one adds to a structure's max rate.
#[derive(Clone, Debug, Default)]
pub struct UpgradeTable {
    bonus: HashMap<String, u64>,
}

impl UpgradeTable {
    pub fn from_config(cfg: HashMap<String, u64>) -> Self {
        Self { bonus: cfg }
    }

    pub fn with(mut self, item: impl Into<String>, bonus: u64) -> Self {
        self.bonus.insert(item.into(), bonus);
        self
    }

    #[inline]
    pub fn bonus_for(&self, item: &str) -> Option<u64> {
        self.bonus.get(item).copied()
    }
}
