// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// --- 1. Status de Estoque (Derivado) ---
// Nunca é armazenado: sempre calculado a partir de quantity e safety_stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Deriva o status de exibição de um produto.
    pub fn derive(quantity: u32, safety_stock: u32) -> Self {
        if quantity == 0 {
            StockStatus::OutOfStock
        } else if quantity <= safety_stock {
            StockStatus::LowStock
        } else {
            StockStatus::InStock
        }
    }
}

// --- 2. Produto ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub safety_stock: u32,
    pub unit_cost: Decimal,
    pub location: String,
    pub supplier: String,
    pub last_updated: DateTime<Utc>,
}

impl Product {
    pub fn status(&self) -> StockStatus {
        StockStatus::derive(self.quantity, self.safety_stock)
    }

    /// Valor do estoque deste produto (quantidade x custo).
    pub fn stock_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.unit_cost
    }
}

// Dados para cadastro (o serviço completa last_updated)
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub quantity: u32,
    pub safety_stock: u32,
    pub unit_cost: Decimal,
    pub location: String,
    pub supplier: String,
}

// Resposta da API: o produto + o status calculado na leitura.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub status: StockStatus,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let status = product.status();
        Self { product, status }
    }
}

// --- 3. Motivos de Ajuste de Estoque ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockAdjustmentReason {
    Receiving,
    Dispatch,
    ReturnRestock,
    Spoilage,
    Correction,
}
