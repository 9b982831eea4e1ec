//! reqwest client for the Gemini `generateContent` API.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, instrument, warn};

use super::{
    dto::{
        GenerateContentRequest, GenerateContentResponse, HealthArticle, MedicationSuggestion,
        SearchResult, SearchSource,
    },
    error::AiError,
};
use crate::{
    config::AiConfig,
    meals::repo_types::Ingredient,
    nutrition::{NutritionLookup, NutritionalInfo},
};

#[derive(Clone, Debug)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Without an API key every call fails with [`AiError::Disabled`].
    pub fn new(base_url: &str, model: impl Into<String>, api_key: Option<SecretString>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key,
            client: reqwest::Client::new(),
        }
    }

    pub fn from_config(cfg: &AiConfig) -> Self {
        Self::new(&cfg.base_url, cfg.model.clone(), cfg.api_key.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        let key = self.api_key.as_ref().ok_or(AiError::Disabled)?;
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", key.expose_secret())
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body: body.chars().take(256).collect(),
            });
        }
        Ok(resp.json::<GenerateContentResponse>().await?)
    }

    async fn generate_text(&self, request: &GenerateContentRequest) -> Result<String, AiError> {
        self.generate(request)
            .await?
            .text()
            .ok_or(AiError::EmptyResponse)
    }

    /// Totals for the whole ingredient list.
    #[instrument(skip(self, ingredients), fields(ingredients = ingredients.len()))]
    pub async fn try_calculate_nutrition(
        &self,
        ingredients: &[Ingredient],
    ) -> Result<NutritionalInfo, AiError> {
        let list = ingredients
            .iter()
            .map(Ingredient::describe)
            .collect::<Vec<_>>()
            .join(", ");
        let prompt = format!(
            "Analyze the following list of ingredients and calculate the total nutritional \
             values for the entire list combined. The list is: {list}. Provide the total grams \
             of protein, fat, carbohydrates, and sugar."
        );
        let request = GenerateContentRequest::prompt(prompt).with_json_schema(json!({
            "type": "OBJECT",
            "properties": {
                "protein": { "type": "NUMBER", "description": "Total grams of protein." },
                "fat": { "type": "NUMBER", "description": "Total grams of fat." },
                "carbs": { "type": "NUMBER", "description": "Total grams of carbohydrates." },
                "sugar": { "type": "NUMBER", "description": "Total grams of sugar, which is a subset of carbohydrates." }
            },
            "required": ["protein", "fat", "carbs", "sugar"]
        }));

        let text = self.generate_text(&request).await?;
        let info: NutritionalInfo = serde_json::from_str(text.trim())?;
        debug!(protein = info.protein, fat = info.fat, carbs = info.carbs, sugar = info.sugar, "nutrition parsed");
        Ok(info)
    }

    /// Web-grounded explanation of `query` within `context`.
    #[instrument(skip(self))]
    pub async fn try_search(&self, query: &str, context: &str) -> Result<SearchResult, AiError> {
        let request = GenerateContentRequest::prompt(format!(
            "Provide a concise and helpful explanation for \"{query}\" specifically within the context of {context}."
        ))
        .with_search_grounding();
        self.grounded(&request).await
    }

    /// Grounded search that degrades to `None` on any failure.
    pub async fn search(&self, query: &str, context: &str) -> Option<SearchResult> {
        match self.try_search(query, context).await {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(error = %e, query, "search failed");
                None
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn try_search_ingredients(&self, query: &str) -> Result<Vec<String>, AiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let request = GenerateContentRequest::prompt(format!(
            "List common food ingredients that match the search term \"{query}\". Provide only a JSON array of strings."
        ))
        .with_json_schema(json!({
            "type": "ARRAY",
            "items": { "type": "STRING" }
        }));

        let text = self.generate_text(&request).await?;
        let names = parse_items::<String>(&text, "ingredient suggestions")?
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Ok(names)
    }

    pub async fn search_ingredients(&self, query: &str) -> Vec<String> {
        self.try_search_ingredients(query)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, query, "ingredient search failed");
                Vec::new()
            })
    }

    /// Pharmaceuticals, peptides, SARMs, vitamins and minerals matching `query`.
    #[instrument(skip(self))]
    pub async fn try_search_medications(
        &self,
        query: &str,
    ) -> Result<Vec<MedicationSuggestion>, AiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let request = GenerateContentRequest::prompt(format!(
            "You are a pharmaceutical database assistant. Find medications matching the search term \"{query}\". \
             Search across official pharmaceutical drugs, research peptides, SARMs, vitamins, and minerals. \
             For each result, provide its name, a brief description, and its category."
        ))
        .with_json_schema(json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING", "description": "The common or brand name of the substance." },
                    "description": { "type": "STRING", "description": "A brief summary of the substance's purpose or function." },
                    "category": { "type": "STRING", "description": "The category of the substance (e.g., Pharmaceutical, Peptide, SARM, Vitamin, Mineral)." }
                },
                "required": ["name", "description", "category"]
            }
        }));

        let text = self.generate_text(&request).await?;
        let found = parse_items::<MedicationSuggestion>(&text, "medication suggestions")?
            .into_iter()
            .filter(|m| !m.name.trim().is_empty())
            .collect();
        Ok(found)
    }

    pub async fn search_medications(&self, query: &str) -> Vec<MedicationSuggestion> {
        self.try_search_medications(query)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, query, "medication search failed");
                Vec::new()
            })
    }

    /// Up to ten articles from credible health institutions on `topics`.
    #[instrument(skip(self, topics), fields(topics = topics.len()))]
    pub async fn try_fetch_health_articles(
        &self,
        topics: &[String],
    ) -> Result<Vec<HealthArticle>, AiError> {
        if topics.is_empty() {
            return Ok(Vec::new());
        }
        let request = GenerateContentRequest::prompt(format!(
            "Find 10 recent, high-quality articles on the following health topics: {}. Source them from \
             highly credible institutions like the Mayo Clinic, NIH, CDC, WHO, Cleveland Clinic, and \
             Johns Hopkins Medicine. For each article, provide the title, a one-sentence summary, the \
             source institution, and the direct URL.",
            topics.join(", ")
        ))
        .with_json_schema(json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "summary": { "type": "STRING" },
                    "source": { "type": "STRING" },
                    "url": { "type": "STRING" }
                },
                "required": ["title", "summary", "source", "url"]
            }
        }));

        let text = self.generate_text(&request).await?;
        let articles = parse_items::<HealthArticle>(&text, "health articles")?
            .into_iter()
            .filter(|a| !a.title.trim().is_empty() && !a.url.trim().is_empty())
            .collect();
        Ok(articles)
    }

    pub async fn fetch_health_articles(&self, topics: &[String]) -> Vec<HealthArticle> {
        self.try_fetch_health_articles(topics)
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "health articles failed");
                Vec::new()
            })
    }

    /// Recipes and articles for cooking with `ingredients`. `None` for an
    /// empty list or on failure.
    #[instrument(skip(self, ingredients), fields(ingredients = ingredients.len()))]
    pub async fn fetch_recipe_articles(&self, ingredients: &[String]) -> Option<SearchResult> {
        if ingredients.is_empty() {
            return None;
        }
        let request = GenerateContentRequest::prompt(format!(
            "Find recipes and articles about cooking with {}. The content should be from fitness \
             chefs, fitness coaches, or medical dietitians. Summarize the findings and provide links.",
            ingredients.join(", ")
        ))
        .with_search_grounding();

        match self.grounded(&request).await {
            Ok(r) => Some(r),
            Err(e) => {
                warn!(error = %e, "recipe articles failed");
                None
            }
        }
    }

    async fn grounded(&self, request: &GenerateContentRequest) -> Result<SearchResult, AiError> {
        let resp = self.generate(request).await?;
        let summary = resp.text().ok_or(AiError::EmptyResponse)?;

        let chunks = resp.grounding_chunks();
        let sources: Vec<SearchSource> = chunks
            .iter()
            .filter_map(|c| {
                let web = c.web.as_ref()?;
                let uri = web.uri.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
                let title = web
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .unwrap_or("Untitled Source");
                Some(SearchSource {
                    uri: uri.to_string(),
                    title: title.to_string(),
                })
            })
            .collect();
        if sources.len() < chunks.len() {
            debug!(dropped = chunks.len() - sources.len(), "grounding chunks without a web uri dropped");
        }
        Ok(SearchResult { summary, sources })
    }
}

/// Parses a JSON array, skipping entries that do not deserialize as `T`.
fn parse_items<T: DeserializeOwned>(text: &str, what: &str) -> Result<Vec<T>, AiError> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text.trim())?;
    let total = values.len();
    let items: Vec<T> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if items.len() < total {
        warn!(dropped = total - items.len(), what, "entries with unexpected shape dropped");
    }
    Ok(items)
}

#[async_trait]
impl NutritionLookup for GeminiClient {
    async fn calculate_nutrition(
        &self,
        ingredients: &[Ingredient],
    ) -> anyhow::Result<Option<NutritionalInfo>> {
        if !self.is_enabled() || ingredients.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.try_calculate_nutrition(ingredients).await?))
    }
}
