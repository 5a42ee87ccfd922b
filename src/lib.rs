// src/lib.rs

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware as axum_middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

pub mod common;
pub mod config;
pub mod db;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        i18n::Locale,
        request_id::{REQUEST_ID_HEADER, request_id},
        timeout::request_timeout,
    },
};

/// Monta o router completo (usado pelo binário e pelos testes de API).
pub fn router(app_state: AppState) -> Router {
    let inventory_routes = Router::new()
        .route(
            "/products",
            post(handlers::inventory::create_product).get(handlers::inventory::list_products),
        )
        .route("/products/{sku}", get(handlers::inventory::get_product))
        .route("/products/{sku}/stock", post(handlers::inventory::adjust_stock))
        .route("/summary", get(handlers::inventory::inventory_summary));

    let order_routes = Router::new()
        .route(
            "/",
            post(handlers::orders::create_order).get(handlers::orders::list_orders),
        )
        .route("/summary", get(handlers::orders::order_summary))
        .route("/{order_number}", get(handlers::orders::get_order))
        .route("/{order_number}/items", post(handlers::orders::add_line))
        .route("/{order_number}/items/{sku}", delete(handlers::orders::remove_line))
        .route("/{order_number}/transition", post(handlers::orders::transition_order));

    let return_routes = Router::new()
        .route(
            "/",
            post(handlers::returns::create_return).get(handlers::returns::list_returns),
        )
        .route("/summary", get(handlers::returns::return_summary))
        .route(
            "/{rma_number}",
            get(handlers::returns::get_return).delete(handlers::returns::delete_return),
        )
        .route("/{rma_number}/inspect", post(handlers::returns::inspect_return))
        .route("/{rma_number}/disposition", post(handlers::returns::dispose_return));

    let storage_routes = Router::new()
        .route(
            "/requests",
            post(handlers::storage::submit_request).get(handlers::storage::list_requests),
        )
        .route("/requests/{id}/approve", post(handlers::storage::approve_request))
        .route("/requests/{id}/decline", post(handlers::storage::decline_request))
        .route("/summary", get(handlers::storage::capacity_summary));

    let receiving_routes = Router::new()
        .route(
            "/shipments",
            post(handlers::receiving::create_shipment).get(handlers::receiving::list_shipments),
        )
        .route("/shipments/{id}", get(handlers::receiving::get_shipment))
        .route("/shipments/{id}/receive", post(handlers::receiving::receive_items))
        .route("/shipments/{id}/close", post(handlers::receiving::close_shipment))
        .route("/summary", get(handlers::receiving::receiving_summary));

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_notifications))
        .route("/read-all", post(handlers::notifications::mark_all_read))
        .route("/{id}/read", post(handlers::notifications::mark_read))
        .route("/{id}", delete(handlers::notifications::delete_notification));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/dashboard/summary", get(handlers::dashboard::get_summary))
        .route(
            "/api/settings",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .nest("/api/inventory", inventory_routes)
        .nest("/api/orders", order_routes)
        .nest("/api/returns", return_routes)
        .nest("/api/storage", storage_routes)
        .nest("/api/receiving", receiving_routes)
        .nest("/api/notifications", notification_routes)
        .fallback(not_found)
        // Requisições lentas viram 408
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), request_timeout))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            let request_id = request
                .headers()
                .get(&REQUEST_ID_HEADER)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-");
            tracing::info_span!(
                "http",
                method = %request.method(),
                uri = %request.uri(),
                request_id,
            )
        }))
        .layer(axum_middleware::from_fn(request_id))
}

async fn not_found(State(app_state): State<AppState>, locale: Locale) -> impl IntoResponse {
    AppError::ResourceNotFound("rota".to_string()).to_api_error(&locale, &app_state.i18n_store)
}
