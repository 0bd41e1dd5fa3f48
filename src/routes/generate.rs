use axum::{
    Json,
    body::Bytes,
    extract::{State, rejection::BytesRejection},
    http::StatusCode,
};
use macroplan_mealplan::{GeneratedPlan, Preferences};
use serde_json::Value;

use crate::error::ApiError;
use crate::routes::AppState;

/// Largest request body accepted by the generation endpoint, in bytes.
pub const MAX_BODY_BYTES: usize = 3500;

pub async fn preflight() -> StatusCode {
    StatusCode::NO_CONTENT
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// POST /api/generate
///
/// Checks run in order: provider key, body size, JSON syntax. Any body that
/// parses is accepted; its fields are coerced into [`Preferences`]. The route
/// buffers at most `MAX_BODY_BYTES + 1` bytes, so anything larger arrives here
/// as a rejection.
pub async fn action(
    State(app): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GeneratedPlan>, ApiError> {
    let api_key = app.api_key()?;

    let body = body.map_err(|rejection| {
        tracing::debug!(err = %rejection, "request body not buffered");

        ApiError::PayloadTooLarge
    })?;

    if body.is_empty() || body.len() > MAX_BODY_BYTES {
        return Err(ApiError::PayloadTooLarge);
    }

    let raw: Value = serde_json::from_slice(&body).map_err(|_| ApiError::InvalidBody)?;
    let prefs = Preferences::from_raw(&raw);

    tracing::info!(
        protein = prefs.protein,
        fat = prefs.fat,
        carbs = prefs.carbs,
        meals = prefs.num_meals,
        "generating meal plan"
    );

    let generated = app.generator.generate(&api_key, &prefs).await?;

    Ok(Json(generated))
}
