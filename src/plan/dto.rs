use serde::{Deserialize, Serialize};

use crate::{date_key::DateKey, meals::repo_types::MealId, planner::SlotMeal};

#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub meal_id: MealId,
}

#[derive(Debug, Serialize)]
pub struct AssignResponse {
    pub date: DateKey,
    pub meal_id: MealId,
    pub replaced: Option<MealId>,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    /// `YYYY-MM`; defaults to the current month.
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlannedDaysResponse {
    pub month: String,
    pub days: Vec<DateKey>,
}

#[derive(Debug, Serialize)]
pub struct DayMealsResponse {
    pub date: DateKey,
    pub meals: Vec<SlotMeal>,
}
