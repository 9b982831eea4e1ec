pub mod cache;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use cache::{NutrientEntry, NutritionCache, NutritionLookup};
pub use types::NutritionalInfo;
