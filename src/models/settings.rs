// src/models/settings.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::common::validation::validate_positive;

// Regras do motor de RMA (política configurável, não contrato)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RmaRules {
    /// Itens perfeitos devolvidos até N dias após a compra voltam ao estoque.
    pub restock_window_days: i64,
    /// Acima disto a devolução é descartada.
    pub scrap_after_days: i64,
}

impl Default for RmaRules {
    fn default() -> Self {
        Self {
            restock_window_days: 30,
            scrap_after_days: 180,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseSettings {
    pub total_capacity: Decimal, // m²
    pub rma_rules: RmaRules,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSettingsRequest {
    #[validate(custom(function = "validate_positive"))]
    pub total_capacity: Option<Decimal>,

    #[validate(range(min = 0, message = "O prazo de reposição não pode ser negativo."))]
    pub restock_window_days: Option<i64>,

    #[validate(range(min = 1, message = "O prazo de descarte deve ser de pelo menos 1 dia."))]
    pub scrap_after_days: Option<i64>,
}
