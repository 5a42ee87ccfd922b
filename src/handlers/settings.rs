// src/handlers/settings.rs

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::settings::UpdateSettingsRequest,
};

// GET /api/settings
pub async fn get_settings(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.settings_service.get_settings().await)
}

// PUT /api/settings
pub async fn update_settings(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<UpdateSettingsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let settings = app_state
        .settings_service
        .update_settings(payload)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(settings)))
}
