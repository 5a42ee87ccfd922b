// src/middleware/timeout.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{common::error::AppError, config::AppState, middleware::i18n::Locale};

// Limite de tempo por requisição; estourou, responde 408 no formato de erro da API
pub async fn request_timeout(
    State(app_state): State<AppState>,
    locale: Locale,
    request: Request,
    next: Next,
) -> Response {
    let limit = app_state.config.request_timeout;
    let method = request.method().clone();
    let uri = request.uri().clone();

    match tokio::time::timeout(limit, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(%method, %uri, ?limit, "⏱️ Requisição excedeu o tempo limite");
            AppError::RequestTimeout
                .to_api_error(&locale, &app_state.i18n_store)
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use axum::{
        Router,
        http::{HeaderValue, StatusCode, header},
        middleware::from_fn_with_state,
        routing::get,
    };
    use axum_test::TestServer;
    use serde_json::Value;
    use std::time::Duration;

    async fn server() -> TestServer {
        let config = AppConfig {
            request_timeout: Duration::from_millis(50),
            seed_demo_data: false,
            ..AppConfig::default()
        };
        let state = AppState::new(config).await.unwrap();

        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_millis(500)).await;
                    "tarde demais"
                }),
            )
            .route("/fast", get(|| async { "OK" }))
            .layer(from_fn_with_state(state.clone(), request_timeout))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn slow_requests_get_a_json_408() {
        let server = server().await;
        let response = server.get("/slow").await;
        response.assert_status(StatusCode::REQUEST_TIMEOUT);

        let body: Value = response.json();
        assert!(body["error"].is_string());
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn timeout_message_is_localized() {
        let server = server().await;
        let english: Value = server.get("/slow").await.json();
        let portuguese: Value = server
            .get("/slow")
            .add_header(header::ACCEPT_LANGUAGE, HeaderValue::from_static("pt-BR"))
            .await
            .json();
        assert_ne!(english["error"], portuguese["error"]);
    }

    #[tokio::test]
    async fn fast_requests_pass_through() {
        let server = server().await;
        server.get("/fast").await.assert_text("OK");
    }
}
