use serde::{Deserialize, Serialize};

use super::repo_types::{Ingredient, MealId};

#[derive(Debug, Deserialize)]
pub struct CreateMealRequest {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Serialize)]
pub struct CreatedMealResponse {
    pub id: MealId,
}
