use std::iter::Sum;
use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Grams of each tracked macro. Values come from an external service and are
/// not range-checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalInfo {
    pub protein: f64,
    pub fat: f64,
    pub carbs: f64,
    pub sugar: f64,
}

impl NutritionalInfo {
    pub fn new(protein: f64, fat: f64, carbs: f64, sugar: f64) -> Self {
        Self {
            protein,
            fat,
            carbs,
            sugar,
        }
    }
}

impl Add for NutritionalInfo {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for NutritionalInfo {
    fn add_assign(&mut self, rhs: Self) {
        self.protein += rhs.protein;
        self.fat += rhs.fat;
        self.carbs += rhs.carbs;
        self.sugar += rhs.sugar;
    }
}

impl Sum for NutritionalInfo {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}
