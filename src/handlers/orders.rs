// src/handlers/orders.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::{validate_not_blank, validate_positive},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::orders::{OrderDetail, OrderLine, OrderPriority, OrderStatus},
    services::order_service::NewOrder,
};

// ---
// Payloads
// ---
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OrderLinePayload {
    #[validate(custom(function = "validate_not_blank", message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(custom(function = "validate_not_blank", message = "O nome do item é obrigatório."))]
    pub name: String,

    #[validate(range(min = 1, message = "A quantidade deve ser pelo menos 1."))]
    pub quantity: u32,

    #[validate(custom(function = "validate_positive"))]
    pub unit_price: Decimal,
}

impl From<OrderLinePayload> for OrderLine {
    fn from(p: OrderLinePayload) -> Self {
        OrderLine {
            sku: p.sku.trim().to_string(),
            name: p.name.trim().to_string(),
            quantity: p.quantity,
            unit_price: p.unit_price,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderPayload {
    #[validate(custom(function = "validate_not_blank", message = "O cliente é obrigatório."))]
    pub customer: String,

    #[validate(email(message = "E-mail inválido."))]
    pub customer_email: Option<String>,

    pub shipping_address: Option<String>,
    pub notes: Option<String>,

    #[serde(default)]
    pub priority: OrderPriority,

    pub due_date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, message = "O pedido precisa de pelo menos um item."), nested)]
    pub lines: Vec<OrderLinePayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionPayload {
    pub status: OrderStatus,
    pub tracking_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListOrdersQuery {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

// ---
// Handlers
// ---
pub async fn create_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateOrderPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .order_service
        .create_order(NewOrder {
            customer: payload.customer,
            customer_email: payload.customer_email,
            shipping_address: payload.shipping_address,
            notes: payload.notes,
            priority: payload.priority,
            due_date: payload.due_date,
            lines: payload.lines.into_iter().map(OrderLine::from).collect(),
        })
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(OrderDetail::from(order))))
}

pub async fn list_orders(
    State(app_state): State<AppState>,
    Query(query): Query<ListOrdersQuery>,
) -> impl IntoResponse {
    let orders: Vec<OrderDetail> = app_state
        .order_service
        .list_orders(query.status, query.search.as_deref())
        .await
        .into_iter()
        .map(OrderDetail::from)
        .collect();

    Json(orders)
}

pub async fn get_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_number): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .get_order(&order_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(OrderDetail::from(order)))
}

pub async fn add_line(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_number): Path<String>,
    Json(payload): Json<OrderLinePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let order = app_state
        .order_service
        .add_line(&order_number, payload.into())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(OrderDetail::from(order)))
}

pub async fn remove_line(
    State(app_state): State<AppState>,
    locale: Locale,
    Path((order_number, sku)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let order = app_state
        .order_service
        .remove_line(&order_number, &sku)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(OrderDetail::from(order)))
}

pub async fn transition_order(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(order_number): Path<String>,
    Json(payload): Json<TransitionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let tracking_number = payload
        .tracking_number
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let order = app_state
        .order_service
        .transition_order(&order_number, payload.status, tracking_number)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(OrderDetail::from(order)))
}

pub async fn order_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.order_summary().await)
}
