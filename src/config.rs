use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct AiConfig {
    pub api_key: Option<SecretString>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub height_m: f64,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Reads settings through `get`, so tests need not touch the process env.
    pub fn from_env_with<F>(mut get: F) -> anyhow::Result<Self>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let api_key = get("GEMINI_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .map(|k| SecretString::new(k.into()));
        let ai = AiConfig {
            api_key,
            model: get("GEMINI_MODEL").unwrap_or_else(|| "gemini-2.5-flash".into()),
            base_url: get("GEMINI_BASE_URL")
                .unwrap_or_else(|| "https://generativelanguage.googleapis.com".into()),
        };

        let port = match get("APP_PORT") {
            Some(v) => v.parse::<u16>()?,
            None => 8080,
        };
        let height_m = match get("USER_HEIGHT_M") {
            Some(v) => v.parse::<f64>()?,
            None => 1.78,
        };
        anyhow::ensure!(
            height_m.is_finite() && height_m > 0.0,
            "USER_HEIGHT_M must be a positive number of metres"
        );

        Ok(Self {
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            height_m,
            ai,
        })
    }
}
