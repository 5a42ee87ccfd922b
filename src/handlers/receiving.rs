// src/handlers/receiving.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::validate_not_blank,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::receiving::{ReceivingStatus, ShipmentView},
    services::receiving_service::{ExpectedLine, NewShipment},
};

// ---
// Payloads
// ---
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedLinePayload {
    #[validate(custom(function = "validate_not_blank", message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(range(min = 1, message = "A quantidade esperada deve ser pelo menos 1."))]
    pub expected: u32,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipmentPayload {
    #[validate(custom(function = "validate_not_blank", message = "O número do PO é obrigatório."))]
    pub po_number: String,

    #[validate(custom(function = "validate_not_blank", message = "O fornecedor é obrigatório."))]
    pub supplier: String,

    pub inspector: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,

    #[validate(length(min = 1, message = "A remessa precisa de pelo menos um item."), nested)]
    pub lines: Vec<ExpectedLinePayload>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveItemsPayload {
    #[validate(custom(function = "validate_not_blank", message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct ListShipmentsQuery {
    pub status: Option<ReceivingStatus>,
}

// ---
// Handlers
// ---
pub async fn create_shipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateShipmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let shipment = app_state
        .receiving_service
        .create_shipment(NewShipment {
            po_number: payload.po_number.trim().to_string(),
            supplier: payload.supplier.trim().to_string(),
            inspector: payload.inspector,
            arrival_date: payload.arrival_date,
            notes: payload.notes,
            lines: payload
                .lines
                .into_iter()
                .map(|l| ExpectedLine { sku: l.sku.trim().to_string(), expected: l.expected })
                .collect(),
        })
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ShipmentView::from(shipment))))
}

pub async fn list_shipments(
    State(app_state): State<AppState>,
    Query(query): Query<ListShipmentsQuery>,
) -> impl IntoResponse {
    let shipments: Vec<ShipmentView> = app_state
        .receiving_service
        .list_shipments(query.status)
        .await
        .into_iter()
        .map(ShipmentView::from)
        .collect();

    Json(shipments)
}

pub async fn get_shipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let shipment = app_state
        .receiving_service
        .get_shipment(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ShipmentView::from(shipment)))
}

pub async fn receive_items(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
    Json(payload): Json<ReceiveItemsPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let shipment = app_state
        .receiving_service
        .receive_items(&id, payload.sku.trim(), payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ShipmentView::from(shipment)))
}

pub async fn close_shipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let shipment = app_state
        .receiving_service
        .close_shipment(&id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ShipmentView::from(shipment)))
}

pub async fn receiving_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.receiving_service.summary().await)
}
