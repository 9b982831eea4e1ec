use std::{collections::HashSet, sync::Arc};

use serde::Serialize;

use crate::{
    date_key::DateKey,
    meals::{
        repo::MealCatalog,
        repo_types::{Ingredient, Meal, MealId},
    },
    nutrition::{NutrientEntry, NutritionCache, NutritionLookup, NutritionalInfo},
    plan::{
        repo::DayPlanIndex,
        repo_types::{MealSlot, PlannedMeal},
    },
};

/// Nutrition overview of one day. `totals` holds the sum of every meal that
/// has resolved so far and is `None` until at least one has.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub meals: Vec<Meal>,
    pub totals: Option<NutritionalInfo>,
    pub loading: bool,
}

/// A filled slot of a day together with the meal's lookup state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotMeal {
    pub slot: MealSlot,
    pub meal: Meal,
    pub nutrition: NutrientEntry,
}

/// Owns the meal catalog, the day plan and the nutrition cache.
pub struct Planner {
    catalog: MealCatalog,
    plan: DayPlanIndex,
    nutrition: NutritionCache,
}

impl Planner {
    pub fn new(lookup: Arc<dyn NutritionLookup>) -> Self {
        Self {
            catalog: MealCatalog::new(),
            plan: DayPlanIndex::new(),
            nutrition: NutritionCache::new(lookup),
        }
    }

    pub fn catalog(&self) -> &MealCatalog {
        &self.catalog
    }

    pub fn plan(&self) -> &DayPlanIndex {
        &self.plan
    }

    #[cfg(test)]
    pub fn nutrition(&self) -> &NutritionCache {
        &self.nutrition
    }

    pub fn create_meal(&mut self, name: &str, ingredients: Vec<Ingredient>) -> Option<MealId> {
        self.catalog.create_meal(name, ingredients)
    }

    pub fn remove_meal(&mut self, id: &MealId) -> Option<Meal> {
        self.catalog.remove_meal(id)
    }

    pub fn assign(&mut self, date: DateKey, slot: MealSlot, meal_id: MealId) -> Option<MealId> {
        self.plan.assign(date, slot, meal_id)
    }

    pub fn unassign(&mut self, date: DateKey, slot: MealSlot) -> Option<PlannedMeal> {
        self.plan.unassign(date, slot)
    }

    /// Planned entries of the day joined with their meals. Entries whose meal
    /// is gone from the catalog are skipped.
    fn resolve_day(&self, date: DateKey) -> Vec<(&PlannedMeal, &Meal)> {
        self.plan
            .planned_for(date)
            .into_iter()
            .filter_map(|pm| self.catalog.get_meal(&pm.meal_id).map(|meal| (pm, meal)))
            .collect()
    }

    /// Sums the day's nutrition. Meals seen for the first time get their
    /// lookup started; meals still loading set `loading` but do not hold back
    /// the totals of those already resolved.
    pub fn summarize(&self, date: DateKey) -> DailySummary {
        let day = self.resolve_day(date);

        let mut totals: Option<NutritionalInfo> = None;
        let mut loading = false;
        for (_, meal) in &day {
            self.nutrition.ensure_requested(meal);
            match self.nutrition.get(&meal.id) {
                NutrientEntry::Loading => loading = true,
                NutrientEntry::Resolved(info) => {
                    *totals.get_or_insert_with(NutritionalInfo::default) += info;
                }
                NutrientEntry::Failed | NutrientEntry::NotRequested => {}
            }
        }

        DailySummary {
            meals: day.into_iter().map(|(_, meal)| meal.clone()).collect(),
            totals,
            loading,
        }
    }

    /// Filled slots of the day in Breakfast, Lunch, Dinner, Snack order.
    pub fn day_meals(&self, date: DateKey) -> Vec<SlotMeal> {
        MealSlot::ALL
            .iter()
            .filter_map(|&slot| {
                let planned = self.plan.slot(date, slot)?;
                let meal = self.catalog.get_meal(&planned.meal_id)?;
                self.nutrition.ensure_requested(meal);
                Some(SlotMeal {
                    slot,
                    meal: meal.clone(),
                    nutrition: self.nutrition.get(&meal.id),
                })
            })
            .collect()
    }

    /// Distinct ingredient names of the day, first occurrence first.
    pub fn day_ingredients(&self, date: DateKey) -> Vec<String> {
        let mut seen = HashSet::new();
        self.resolve_day(date)
            .into_iter()
            .flat_map(|(_, meal)| meal.ingredients.iter())
            .map(|ing| ing.name.trim().to_string())
            .filter(|name| !name.is_empty() && seen.insert(name.clone()))
            .collect()
    }
}
