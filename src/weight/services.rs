use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::date_key::DateKey;

pub const LBS_PER_KG: f64 = 2.20462;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Lbs,
    Kg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeFrame {
    #[default]
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "2Y")]
    TwoYears,
}

impl TimeFrame {
    pub fn days(self) -> usize {
        match self {
            TimeFrame::OneMonth => 30,
            TimeFrame::OneYear => 365,
            TimeFrame::TwoYears => 730,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum WeightError {
    #[error("weight must be a positive number, got {0}")]
    InvalidWeight(f64),
}

/// One day's weigh-in. `weight` is in pounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightEntry {
    pub date: DateKey,
    pub weight: f64,
    pub bmi: f64,
}

pub fn to_lbs(value: f64, unit: WeightUnit) -> f64 {
    match unit {
        WeightUnit::Lbs => value,
        WeightUnit::Kg => value * LBS_PER_KG,
    }
}

pub fn bmi(weight_lbs: f64, height_m: f64) -> f64 {
    (weight_lbs / LBS_PER_KG) / (height_m * height_m)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Weigh-ins sorted by date, one per day.
#[derive(Debug)]
pub struct WeightLog {
    height_m: f64,
    entries: Vec<WeightEntry>,
}

impl WeightLog {
    pub fn new(height_m: f64) -> Self {
        Self {
            height_m,
            entries: Vec::new(),
        }
    }

    /// Stores a weigh-in for `date`, replacing that day's earlier one.
    pub fn record(
        &mut self,
        date: DateKey,
        value: f64,
        unit: WeightUnit,
    ) -> Result<&WeightEntry, WeightError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(WeightError::InvalidWeight(value));
        }
        let lbs = to_lbs(value, unit);
        let index = bmi(lbs, self.height_m);
        if !lbs.is_finite() || !index.is_finite() {
            return Err(WeightError::InvalidWeight(value));
        }
        let entry = WeightEntry {
            date,
            weight: round1(lbs),
            bmi: round1(index),
        };
        info!(%date, weight_lbs = entry.weight, bmi = entry.bmi, "weight recorded");

        let idx = match self.entries.binary_search_by(|e| e.date.cmp(&date)) {
            Ok(i) => {
                self.entries[i] = entry;
                i
            }
            Err(i) => {
                self.entries.insert(i, entry);
                i
            }
        };
        Ok(&self.entries[idx])
    }

    /// The most recent entries covered by `frame`.
    pub fn window(&self, frame: TimeFrame) -> &[WeightEntry] {
        let start = self.entries.len().saturating_sub(frame.days());
        &self.entries[start..]
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[WeightEntry] {
        &self.entries
    }
}
