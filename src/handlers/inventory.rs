// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::{ApiError, AppError},
        validation::{validate_not_blank, validate_not_negative},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::inventory::{NewProduct, ProductView, StockAdjustmentReason, StockStatus},
};

fn validate_non_zero(val: i64) -> Result<(), ValidationError> {
    if val == 0 {
        let mut err = ValidationError::new("non_zero");
        err.message = Some("O ajuste não pode ser zero.".into());
        return Err(err);
    }
    Ok(())
}

// ---
// Payload: CreateProduct
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(custom(function = "validate_not_blank", message = "O SKU é obrigatório."))]
    pub sku: String,

    #[validate(custom(function = "validate_not_blank", message = "O nome é obrigatório."))]
    pub name: String,

    #[validate(custom(function = "validate_not_blank", message = "A categoria é obrigatória."))]
    pub category: String,

    pub description: Option<String>,

    #[serde(default)]
    pub quantity: u32,

    #[serde(default)]
    pub safety_stock: u32,

    #[validate(custom(function = "validate_not_negative"))]
    pub unit_cost: Decimal,

    #[serde(default)]
    pub location: String,

    #[serde(default)]
    pub supplier: String,
}

pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .inventory_service
        .create_product(NewProduct {
            sku: payload.sku.trim().to_string(),
            name: payload.name.trim().to_string(),
            category: payload.category.trim().to_string(),
            description: payload.description,
            quantity: payload.quantity,
            safety_stock: payload.safety_stock,
            unit_cost: payload.unit_cost,
            location: payload.location,
            supplier: payload.supplier,
        })
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(ProductView::from(product))))
}

#[derive(Debug, Deserialize)]
pub struct ListProductsQuery {
    pub search: Option<String>,
    pub status: Option<StockStatus>,
}

pub async fn list_products(
    State(app_state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> impl IntoResponse {
    let products: Vec<ProductView> = app_state
        .inventory_service
        .list_products(query.search.as_deref(), query.status)
        .await
        .into_iter()
        .map(ProductView::from)
        .collect();

    Json(products)
}

pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(sku): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .inventory_service
        .get_product(&sku)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ProductView::from(product)))
}

// ---
// Payload: AdjustStock (entrada positiva, saída negativa)
// ---
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AdjustStockPayload {
    #[validate(custom(function = "validate_non_zero"))]
    pub delta: i64,

    pub reason: StockAdjustmentReason,

    #[validate(length(max = 500, message = "Observação muito longa."))]
    pub notes: Option<String>,
}

pub async fn adjust_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(sku): Path<String>,
    Json(payload): Json<AdjustStockPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .inventory_service
        .adjust_stock(&sku, payload.delta, payload.reason, payload.notes.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(ProductView::from(product)))
}

pub async fn inventory_summary(State(app_state): State<AppState>) -> impl IntoResponse {
    Json(app_state.dashboard_service.inventory_summary().await)
}
