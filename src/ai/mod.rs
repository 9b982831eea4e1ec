pub mod client;
pub mod dto;
mod error;
pub mod handlers;

use crate::state::AppState;
use axum::Router;

pub use client::GeminiClient;

pub fn router() -> Router<AppState> {
    handlers::search_routes()
}
