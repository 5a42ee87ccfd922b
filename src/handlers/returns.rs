// src/handlers/returns.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::returns::{DispositionAction, ItemCondition, ReturnReason, ReturnStatus},
    services::returns_service::NewReturn,
};

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReturnPayload {
    #[validate(length(min = 1, message = "O número do pedido é obrigatório."))]
    pub order_number: String,

    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    pub sku: String,

    #[serde(default = "default_quantity")]
    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: u32,

    pub reason: ReturnReason,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectPayload {
    pub approve: bool,
    pub condition: ItemCondition,
    pub notes: Option<String>,
}

// Sem `action`, o motor de regras escolhe
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispositionPayload {
    #[serde(default)]
    pub action: Option<DispositionAction>,
}

#[derive(Debug, Deserialize)]
pub struct ListReturnsQuery {
    pub status: Option<ReturnStatus>,
}

pub async fn create_return(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateReturnPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let rma = app_state
        .returns_service
        .create_return(NewReturn {
            order_number: payload.order_number,
            sku: payload.sku,
            quantity: payload.quantity,
            reason: payload.reason,
            notes: payload.notes,
        })
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(rma)))
}

pub async fn list_returns(
    State(app_state): State<AppState>,
    Query(query): Query<ListReturnsQuery>,
) -> impl IntoResponse {
    Json(app_state.returns_service.list_returns(query.status).await)
}

pub async fn get_return(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(rma_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let rma = app_state
        .returns_service
        .get_return(&rma_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(rma))
}

pub async fn inspect_return(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(rma_number): Path<String>,
    Json(payload): Json<InspectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let rma = app_state
        .returns_service
        .inspect_return(&rma_number, payload.approve, payload.condition, payload.notes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(rma))
}

pub async fn dispose_return(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(rma_number): Path<String>,
    Json(payload): Json<DispositionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let rma = app_state
        .returns_service
        .dispose_return(&rma_number, payload.action)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(rma))
}

pub async fn delete_return(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(rma_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .returns_service
        .delete_return(&rma_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn return_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.return_summary().await)
}
