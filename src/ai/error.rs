use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("AI features are disabled: no API key configured")]
    Disabled,
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI response had no text")]
    EmptyResponse,
    #[error("AI response was not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
