use std::collections::HashMap;

use crate::config::FuelEntry;
use crate::registry::RegistryError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fuel {
    pub burn_ticks: u32,
    /// Item left behind once one unit has burned (e.g. a bucket).
    pub remainder: Option<String>,
}

/// Burnable items and how long one unit keeps a burner running.
#[derive(Clone, Debug, Default)]
pub struct FuelRegistry {
    fuels: HashMap<String, Fuel>,
}

impl FuelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(cfg: HashMap<String, FuelEntry>) -> Result<Self, RegistryError> {
        let mut reg = FuelRegistry::new();
        for (item, entry) in cfg {
            let fuel = match entry {
                FuelEntry::Ticks(burn_ticks) => Fuel {
                    burn_ticks,
                    remainder: None,
                },
                FuelEntry::Detail {
                    burn_ticks,
                    remainder,
                } => Fuel {
                    burn_ticks,
                    remainder,
                },
            };
            if fuel.burn_ticks == 0 {
                return Err(RegistryError::ZeroBurn(item));
            }
            reg.fuels.insert(item, fuel);
        }
        Ok(reg)
    }

    pub fn with(mut self, item: impl Into<String>, burn_ticks: u32) -> Self {
        self.fuels.insert(
            item.into(),
            Fuel {
                burn_ticks,
                remainder: None,
            },
        );
        self
    }

    pub fn with_remainder(
        mut self,
        item: impl Into<String>,
        burn_ticks: u32,
        remainder: impl Into<String>,
    ) -> Self {
        self.fuels.insert(
            item.into(),
            Fuel {
                burn_ticks,
                remainder: Some(remainder.into()),
            },
        );
        self
    }

    #[inline]
    pub fn burn_ticks_for(&self, item: &str) -> Option<u32> {
        self.fuels.get(item).map(|f| f.burn_ticks)
    }

    #[inline]
    pub fn remainder_for(&self, item: &str) -> Option<&str> {
        self.fuels.get(item).and_then(|f| f.remainder.as_deref())
    }

    pub fn len(&self) -> usize {
        self.fuels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fuels.is_empty()
    }
}
