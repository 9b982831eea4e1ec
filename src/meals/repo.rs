use tracing::{debug, info};

use super::repo_types::{Ingredient, Meal, MealId};

/// In-memory meal catalog. Iteration follows insertion order.
#[derive(Debug, Default)]
pub struct MealCatalog {
    meals: Vec<Meal>,
}

impl MealCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a meal and returns its fresh id. A blank name or an empty
    /// ingredient list leaves the catalog untouched and yields `None`.
    pub fn create_meal(&mut self, name: &str, ingredients: Vec<Ingredient>) -> Option<MealId> {
        let name = name.trim();
        if name.is_empty() || ingredients.is_empty() {
            debug!(
                meal_name = name,
                ingredients = ingredients.len(),
                "meal rejected: needs a name and at least one ingredient"
            );
            return None;
        }

        let id = MealId::generate();
        self.meals.push(Meal {
            id: id.clone(),
            name: name.to_string(),
            ingredients,
        });
        info!(meal_id = %id, meal_name = name, "meal created");
        Some(id)
    }

    pub fn get_meal(&self, id: &MealId) -> Option<&Meal> {
        self.meals.iter().find(|m| &m.id == id)
    }

    pub fn list(&self) -> &[Meal] {
        &self.meals
    }

    /// Removes a meal. Plans that still point at it are left alone and read
    /// as "no meal" from then on.
    pub fn remove_meal(&mut self, id: &MealId) -> Option<Meal> {
        let pos = self.meals.iter().position(|m| &m.id == id)?;
        let meal = self.meals.remove(pos);
        info!(meal_id = %id, "meal removed");
        Some(meal)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.meals.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::repo_types::FoodUnit;

    fn lettuce() -> Ingredient {
        Ingredient::new("Lettuce", "100", FoodUnit::Gram)
    }

    #[test]
    fn create_rejects_blank_name_or_no_ingredients() {
        let mut catalog = MealCatalog::new();
        assert!(catalog.create_meal("", vec![]).is_none());
        assert!(catalog.create_meal("Salad", vec![]).is_none());
        assert!(catalog.create_meal("   ", vec![lettuce()]).is_none());
        assert!(catalog.is_empty());
    }

    #[test]
    fn created_meal_is_retrievable() {
        let mut catalog = MealCatalog::new();
        let id = catalog
            .create_meal("Salad", vec![lettuce()])
            .expect("valid meal");
        let meal = catalog.get_meal(&id).expect("stored");
        assert_eq!(meal.name, "Salad");
        assert_eq!(meal.ingredients, vec![lettuce()]);
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn name_is_trimmed() {
        let mut catalog = MealCatalog::new();
        let id = catalog.create_meal("  Salad ", vec![lettuce()]).unwrap();
        assert_eq!(catalog.get_meal(&id).unwrap().name, "Salad");
    }

    #[test]
    fn list_keeps_insertion_order() {
        let mut catalog = MealCatalog::new();
        let a = catalog.create_meal("Oatmeal", vec![lettuce()]).unwrap();
        let b = catalog.create_meal("Salad", vec![lettuce()]).unwrap();
        let c = catalog.create_meal("Salmon", vec![lettuce()]).unwrap();
        let ids: Vec<_> = catalog.list().iter().map(|m| m.id.clone()).collect();
        assert_eq!(ids, vec![a, b, c]);
    }

    #[test]
    fn remove_then_lookup_is_not_found() {
        let mut catalog = MealCatalog::new();
        let id = catalog.create_meal("Salad", vec![lettuce()]).unwrap();
        assert!(catalog.remove_meal(&id).is_some());
        assert!(catalog.get_meal(&id).is_none());
        assert!(catalog.remove_meal(&id).is_none());
        assert!(catalog.get_meal(&MealId::from("m-unknown")).is_none());
    }
}
