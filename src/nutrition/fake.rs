use std::{
    collections::HashMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use super::{cache::NutritionLookup, types::NutritionalInfo};
use crate::meals::repo_types::Ingredient;

#[derive(Debug, Clone, Copy)]
pub enum FakeResponse {
    Resolve(NutritionalInfo),
    Empty,
    Error,
    /// Never completes.
    Pending,
}

/// Answers by the name of a meal's first ingredient; unknown names get `Empty`.
#[derive(Debug, Default)]
pub struct FakeLookup {
    responses: HashMap<String, FakeResponse>,
    calls: AtomicUsize,
}

impl FakeLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, first_ingredient: &str, response: FakeResponse) -> Self {
        self.responses.insert(first_ingredient.to_string(), response);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionLookup for FakeLookup {
    async fn calculate_nutrition(
        &self,
        ingredients: &[Ingredient],
    ) -> anyhow::Result<Option<NutritionalInfo>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = ingredients.first().map(|i| i.name.as_str()).unwrap_or_default();
        match self.responses.get(key).copied().unwrap_or(FakeResponse::Empty) {
            FakeResponse::Resolve(info) => Ok(Some(info)),
            FakeResponse::Empty => Ok(None),
            FakeResponse::Error => anyhow::bail!("nutrition service unavailable"),
            FakeResponse::Pending => std::future::pending().await,
        }
    }
}
