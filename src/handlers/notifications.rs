// src/handlers/notifications.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    common::error::ApiError, config::AppState, middleware::i18n::Locale,
    models::notifications::NotificationCategory,
};

#[derive(Debug, Deserialize)]
pub struct ListNotificationsQuery {
    pub category: Option<NotificationCategory>,
    pub search: Option<String>,
}

pub async fn list_notifications(
    State(app_state): State<AppState>,
    Query(query): Query<ListNotificationsQuery>,
) -> impl IntoResponse {
    Json(
        app_state
            .notification_service
            .list_notifications(query.category, query.search.as_deref())
            .await,
    )
}

pub async fn mark_read(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let notification = app_state
        .notification_service
        .mark_read(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(notification))
}

pub async fn mark_all_read(State(app_state): State<AppState>) -> impl IntoResponse {
    let updated = app_state.notification_service.mark_all_read().await;
    Json(json!({ "updated": updated }))
}

pub async fn delete_notification(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .notification_service
        .delete_notification(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
