// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{orders::OrderStatus, returns::ReturnStatus, storage::CapacitySummary};

// 1. Cards da página de Inventário
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub in_stock: usize,
    pub low_stock: usize,
    pub out_of_stock: usize,
    pub total_units: u64,
    pub total_value: Decimal, // Σ quantidade x custo
}

// 2. Cards da página de Pedidos
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub total_orders: usize,
    pub by_status: BTreeMap<OrderStatus, usize>,
    pub open_orders: usize,
    pub total_value: Decimal,
}

// 3. Cards da página de Devoluções
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnSummary {
    pub total_returns: usize,
    pub by_status: BTreeMap<ReturnStatus, usize>,
    pub total_value: Decimal,
}

// 4. Resumo geral (Dashboard)
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub inventory_value: Decimal,
    pub low_stock_products: usize,
    pub out_of_stock_products: usize,
    pub pending_orders: usize,
    pub open_orders: usize,
    pub orders_value: Decimal,
    pub returns_rate: Decimal, // % devoluções / pedidos
    pub returns_value: Decimal,
    pub storage: CapacitySummary,
    pub unread_notifications: usize,
}
