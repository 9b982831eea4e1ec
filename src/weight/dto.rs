use serde::Deserialize;

use super::services::{TimeFrame, WeightUnit};

#[derive(Debug, Deserialize)]
pub struct RecordWeightRequest {
    pub value: f64,
    #[serde(default)]
    pub unit: WeightUnit,
}

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub range: TimeFrame,
}
