use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    /// Energy drawn every tick while running.
    pub eu: u64,
    /// Ticks of full-rate progress needed to finish.
    pub duration: u32,
}

impl Recipe {
    pub fn new(id: impl Into<String>, eu: u64, duration: u32) -> Self {
        Self {
            id: id.into(),
            eu,
            duration,
        }
    }

    #[inline]
    pub fn total_energy(&self) -> u64 {
        self.eu.saturating_mul(self.duration as u64)
    }
}

#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid recipe table: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("recipe `{0}` is defined twice")]
    Duplicate(String),
    #[error("recipe `{0}` has zero duration")]
    ZeroDuration(String),
}

#[derive(Deserialize)]
struct RecipesConfig {
    #[serde(default)]
    recipes: Vec<Recipe>,
}

#[derive(Clone, Debug, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    by_id: HashMap<String, usize>,
}

impl RecipeBook {
    pub fn from_recipes(recipes: Vec<Recipe>) -> Result<Self, RecipeError> {
        let mut by_id = HashMap::with_capacity(recipes.len());
        for (i, r) in recipes.iter().enumerate() {
            if r.duration == 0 {
                return Err(RecipeError::ZeroDuration(r.id.clone()));
            }
            if by_id.insert(r.id.clone(), i).is_some() {
                return Err(RecipeError::Duplicate(r.id.clone()));
            }
        }
        Ok(Self { recipes, by_id })
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, RecipeError> {
        let cfg: RecipesConfig = toml::from_str(toml_str)?;
        Self::from_recipes(cfg.recipes)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, RecipeError> {
        let path = path.as_ref();
        let s = fs::read_to_string(path).map_err(|source| RecipeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&s)
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.by_id.get(id).map(|i| &self.recipes[*i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}
