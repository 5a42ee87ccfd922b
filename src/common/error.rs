// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// O erro de domínio único. Serviços e repositórios só devolvem isto.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Transição inválida de {entity}: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("Capacidade excedida: solicitado {requested} m², disponível {available} m²")]
    CapacityExceeded { requested: Decimal, available: Decimal },

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Recurso já existe: {0}")]
    AlreadyExists(String),

    #[error("Pedido {order_number} não aceita alterações no status {status}")]
    OrderLocked { order_number: String, status: String },

    #[error("Tempo limite da requisição excedido")]
    RequestTimeout,

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::CapacityExceeded { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_) => StatusCode::CONFLICT,
            AppError::OrderLocked { .. } => StatusCode::CONFLICT,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Cria um erro de validação para um único campo, no mesmo formato do `validator`.
    pub fn field(field: &'static str, code: &'static str, message: &'static str) -> Self {
        let mut error = validator::ValidationError::new(code);
        error.message = Some(message.into());
        let mut errors = validator::ValidationErrors::new();
        errors.add(field, error);
        AppError::ValidationError(errors)
    }

    /// Converte o erro numa resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status_code();

        let (key, params): (&str, Vec<(&str, String)>) = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                return ApiError {
                    status,
                    error: i18n.translate(lang, "errors.validation", &[]),
                    details: Some(json!(details)),
                };
            }
            AppError::InvalidTransition { entity, from, to } => (
                "errors.invalid_transition",
                vec![
                    ("entity", entity.to_string()),
                    ("from", from.clone()),
                    ("to", to.clone()),
                ],
            ),
            AppError::CapacityExceeded { requested, available } => (
                "errors.capacity_exceeded",
                vec![
                    ("requested", requested.to_string()),
                    ("available", available.to_string()),
                ],
            ),
            AppError::ResourceNotFound(resource) => {
                ("errors.not_found", vec![("resource", resource.clone())])
            }
            AppError::AlreadyExists(resource) => {
                ("errors.already_exists", vec![("resource", resource.clone())])
            }
            AppError::OrderLocked { order_number, status } => (
                "errors.order_locked",
                vec![("orderNumber", order_number.clone()), ("status", status.clone())],
            ),
            AppError::RequestTimeout => ("errors.timeout", vec![]),
            AppError::InternalServerError(e) => {
                // O detalhe vai só para o log
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                ("errors.internal", vec![])
            }
        };

        ApiError {
            status,
            error: i18n.translate(lang, key, &params),
            details: None,
        }
    }
}

// O corpo de erro que o frontend recebe.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}
