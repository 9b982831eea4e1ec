use std::{
    collections::{hash_map::Entry, HashMap},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::types::NutritionalInfo;
use crate::meals::repo_types::{Ingredient, Meal, MealId};

/// External nutrition computation for a list of ingredients.
/// `Ok(None)` means the service answered without a usable result.
#[async_trait]
pub trait NutritionLookup: Send + Sync {
    async fn calculate_nutrition(
        &self,
        ingredients: &[Ingredient],
    ) -> anyhow::Result<Option<NutritionalInfo>>;
}

/// Lookup state of a single meal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum NutrientEntry {
    NotRequested,
    Loading,
    Resolved(NutritionalInfo),
    Failed,
}

impl NutrientEntry {
    #[cfg(test)]
    pub fn is_loading(&self) -> bool {
        matches!(self, NutrientEntry::Loading)
    }
}

/// Per-meal memo of nutrition lookups. Every meal is looked up at most once
/// per session; a failed lookup stays failed.
#[derive(Clone)]
pub struct NutritionCache {
    entries: Arc<Mutex<HashMap<MealId, NutrientEntry>>>,
    lookup: Arc<dyn NutritionLookup>,
}

impl NutritionCache {
    pub fn new(lookup: Arc<dyn NutritionLookup>) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            lookup,
        }
    }

    pub fn get(&self, id: &MealId) -> NutrientEntry {
        lock(&self.entries)
            .get(id)
            .copied()
            .unwrap_or(NutrientEntry::NotRequested)
    }

    /// Starts a lookup for `meal` unless one was already started or the meal
    /// has no ingredients. The entry is marked `Loading` before the lookup is
    /// spawned, so a second call in the same pass is a no-op.
    ///
    /// The returned handle completes once the entry has settled.
    pub fn ensure_requested(&self, meal: &Meal) -> Option<JoinHandle<()>> {
        if meal.ingredients.is_empty() {
            return None;
        }

        match lock(&self.entries).entry(meal.id.clone()) {
            Entry::Occupied(_) => return None,
            Entry::Vacant(slot) => {
                slot.insert(NutrientEntry::Loading);
            }
        }

        let entries = Arc::clone(&self.entries);
        let lookup = Arc::clone(&self.lookup);
        let id = meal.id.clone();
        let ingredients = meal.ingredients.clone();
        debug!(meal_id = %id, ingredients = ingredients.len(), "nutrition lookup dispatched");

        Some(tokio::spawn(async move {
            let settled = match lookup.calculate_nutrition(&ingredients).await {
                Ok(Some(info)) => {
                    debug!(meal_id = %id, ?info, "nutrition resolved");
                    NutrientEntry::Resolved(info)
                }
                Ok(None) => {
                    warn!(meal_id = %id, "nutrition lookup returned no result");
                    NutrientEntry::Failed
                }
                Err(e) => {
                    warn!(meal_id = %id, error = %e, "nutrition lookup failed");
                    NutrientEntry::Failed
                }
            };
            lock(&entries).insert(id, settled);
        }))
    }
}

fn lock(
    entries: &Mutex<HashMap<MealId, NutrientEntry>>,
) -> MutexGuard<'_, HashMap<MealId, NutrientEntry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}
