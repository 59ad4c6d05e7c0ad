use foundry_blocks::item::MAX_STACK;
use foundry_blocks::{ItemStack, UpgradeTable};

use crate::UseOutcome;
use crate::tags::TagRecord;

const TAG_ITEM: &str = "upgrade.item";
const TAG_COUNT: &str = "upgrade.count";

/// A single stack of upgrade items installed in a controller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UpgradeComponent {
    stack: Option<ItemStack>,
}

impl UpgradeComponent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stack(&self) -> Option<&ItemStack> {
        self.stack.as_ref()
    }

    /// Move as much of `held` into the component as fits.
    ///
    /// Passes when `held` is not a known upgrade, differs from the installed
    /// item, or the component is already full.
    pub fn on_use(&mut self, held: &mut ItemStack, table: &UpgradeTable) -> UseOutcome {
        if held.is_empty() || table.bonus_for(&held.item).is_none() {
            return UseOutcome::Pass;
        }
        let current = match &self.stack {
            Some(s) if s.item != held.item => return UseOutcome::Pass,
            Some(s) => s.count,
            None => 0,
        };
        let moved = held.count.min(MAX_STACK - current.min(MAX_STACK));
        if moved == 0 {
            return UseOutcome::Pass;
        }
        held.decrement(moved);
        self.stack = Some(ItemStack::new(held.item.clone(), current + moved));
        UseOutcome::Accepted
    }

    /// Bonus added to the structure's max rate.
    pub fn add_max_rate(&self, table: &UpgradeTable) -> u64 {
        self.stack
            .as_ref()
            .and_then(|s| {
                table
                    .bonus_for(&s.item)
                    .map(|b| b.saturating_mul(s.count as u64))
            })
            .unwrap_or(0)
    }

    /// Empty the component, returning what was installed.
    pub fn take_drop(&mut self) -> Option<ItemStack> {
        self.stack.take().filter(|s| !s.is_empty())
    }

    pub fn write_tags(&self, tags: &mut TagRecord) {
        match &self.stack {
            Some(s) if !s.is_empty() => {
                tags.put_str(TAG_ITEM, &s.item);
                tags.put_int(TAG_COUNT, s.count as i64);
            }
            _ => {
                tags.remove(TAG_ITEM);
                tags.remove(TAG_COUNT);
            }
        }
    }

    pub fn read_tags(&mut self, tags: &TagRecord) {
        let item = tags.get_str(TAG_ITEM);
        let count = tags.get_int(TAG_COUNT).clamp(0, MAX_STACK as i64) as u32;
        self.stack = if item.is_empty() || count == 0 {
            None
        } else {
            Some(ItemStack::new(item, count))
        };
    }
}
