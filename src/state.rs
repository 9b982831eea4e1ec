use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::warn;

use crate::ai::GeminiClient;
use crate::config::AppConfig;
use crate::medications::repo::MedicationList;
use crate::nutrition::NutritionLookup;
use crate::planner::Planner;
use crate::weight::services::WeightLog;

/// Session state shared by all handlers. Everything lives in memory and is
/// gone on restart.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub planner: Arc<RwLock<Planner>>,
    pub weight: Arc<RwLock<WeightLog>>,
    pub medications: Arc<RwLock<MedicationList>>,
    pub ai: Arc<GeminiClient>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let ai = Arc::new(GeminiClient::from_config(&config.ai));
        if !ai.is_enabled() {
            warn!("GEMINI_API_KEY not set; AI features are disabled");
        }
        let lookup = ai.clone() as Arc<dyn NutritionLookup>;
        Ok(Self::from_parts(config, ai, lookup))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        ai: Arc<GeminiClient>,
        lookup: Arc<dyn NutritionLookup>,
    ) -> Self {
        let weight = WeightLog::new(config.height_m);
        Self {
            config,
            planner: Arc::new(RwLock::new(Planner::new(lookup))),
            weight: Arc::new(RwLock::new(weight)),
            medications: Arc::new(RwLock::new(MedicationList::new())),
            ai,
        }
    }

    /// State with AI disabled and nutrition answered by `lookup`.
    #[cfg(test)]
    pub fn fake(lookup: Arc<dyn NutritionLookup>) -> Self {
        let config = Arc::new(AppConfig::from_env_with(|_| None).expect("default config"));
        let ai = Arc::new(GeminiClient::from_config(&config.ai));
        Self::from_parts(config, ai, lookup)
    }
}
