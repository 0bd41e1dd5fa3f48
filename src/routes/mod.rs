mod generate;
mod health;
mod index;

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware::from_fn,
    response::IntoResponse,
    routing::{get, post},
};
use macroplan_mealplan::{Generator, provider::TextGenerator};

use crate::error::ApiError;
use crate::middleware::api_headers_middleware;
use crate::template::{NotFoundTemplate, render};

pub use generate::MAX_BODY_BYTES;
pub use index::{FORM_UNREADABLE, PLAN_UNREADABLE};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    pub generator: Generator,
}

impl AppState {
    pub fn new(config: crate::config::Config, provider: Arc<dyn TextGenerator>) -> Self {
        Self {
            config,
            generator: Generator::new(provider),
        }
    }

    /// The provider key, looked up on every request.
    pub fn api_key(&self) -> Result<String, ApiError> {
        self.config
            .provider
            .api_key()
            .ok_or(ApiError::MissingApiKey)
    }
}

pub async fn fallback() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, render(NotFoundTemplate))
}

pub fn router(app_state: AppState) -> Router {
    let api = Router::new()
        .route(
            "/api/generate",
            post(generate::action)
                .options(generate::preflight)
                .fallback(generate::method_not_allowed),
        )
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES + 1))
        .layer(from_fn(api_headers_middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/", get(index::page).post(index::action))
        .merge(api)
        .fallback(fallback)
        .with_state(app_state)
}
