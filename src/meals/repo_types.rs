use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque meal identifier, unique for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MealId(String);

impl MealId {
    pub fn generate() -> Self {
        Self(format!("m{}", Uuid::new_v4().simple()))
    }

    #[cfg(test)]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MealId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MealId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for MealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Units offered by the meal designer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FoodUnit {
    #[default]
    #[serde(rename = "g")]
    Gram,
    #[serde(rename = "kg")]
    Kilogram,
    #[serde(rename = "mg")]
    Milligram,
    #[serde(rename = "oz")]
    Ounce,
    #[serde(rename = "lb")]
    Pound,
    #[serde(rename = "mL")]
    Millilitre,
    #[serde(rename = "L")]
    Litre,
    #[serde(rename = "tsp")]
    Teaspoon,
    #[serde(rename = "tbsp")]
    Tablespoon,
    #[serde(rename = "cup")]
    Cup,
    #[serde(rename = "piece(s)")]
    Piece,
}

impl FoodUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            FoodUnit::Gram => "g",
            FoodUnit::Kilogram => "kg",
            FoodUnit::Milligram => "mg",
            FoodUnit::Ounce => "oz",
            FoodUnit::Pound => "lb",
            FoodUnit::Millilitre => "mL",
            FoodUnit::Litre => "L",
            FoodUnit::Teaspoon => "tsp",
            FoodUnit::Tablespoon => "tbsp",
            FoodUnit::Cup => "cup",
            FoodUnit::Piece => "piece(s)",
        }
    }
}

impl fmt::Display for FoodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of a meal. `amount` is kept as typed and only parsed when the
/// meal is sent for a nutrition lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub unit: FoodUnit,
}

impl Ingredient {
    #[cfg(test)]
    pub fn new(name: impl Into<String>, amount: impl Into<String>, unit: FoodUnit) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
            unit,
        }
    }

    pub fn quantity(&self) -> Option<f64> {
        self.amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|q| q.is_finite())
    }

    /// `"150 g of Chicken Breast"`, or just the name when no amount was entered.
    pub fn describe(&self) -> String {
        match self.quantity() {
            Some(q) => format!("{} {} of {}", q, self.unit, self.name.trim()),
            None => self.name.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
    pub id: MealId,
    pub name: String,
    pub ingredients: Vec<Ingredient>,
}
