// src/handlers/storage.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::validate_positive,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::storage::{StorageRequestStatus, StorageType},
    services::storage_service::NewStorageRequest,
};

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitStoragePayload {
    #[validate(length(min = 1, message = "O nome do item é obrigatório."))]
    pub item_name: String,

    pub product_id: Option<String>,

    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: u32,

    // m²
    #[validate(custom(function = "validate_positive"))]
    pub requested_space: Decimal,

    pub storage_type: StorageType,

    #[serde(default)]
    pub special_handling: bool,

    pub requirement: Option<String>,
    pub arrival_date: Option<NaiveDate>,

    #[validate(range(min = 1, message = "A duração deve ser de pelo menos 1 dia."))]
    pub duration_days: Option<u32>,

    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListRequestsQuery {
    pub status: Option<StorageRequestStatus>,
}

pub async fn submit_request(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<SubmitStoragePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let request = app_state
        .storage_service
        .submit_request(NewStorageRequest {
            item_name: payload.item_name,
            product_id: payload.product_id,
            quantity: payload.quantity,
            requested_space: payload.requested_space,
            storage_type: payload.storage_type,
            special_handling: payload.special_handling,
            requirement: payload.requirement,
            arrival_date: payload.arrival_date,
            duration_days: payload.duration_days,
            notes: payload.notes,
        })
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn list_requests(
    State(app_state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> impl IntoResponse {
    Json(app_state.storage_service.list_requests(query.status).await)
}

pub async fn approve_request(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .storage_service
        .approve_request(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(request))
}

pub async fn decline_request(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state
        .storage_service
        .decline_request(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(request))
}

pub async fn capacity_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.storage_service.capacity_summary().await)
}
