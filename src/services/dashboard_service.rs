// src/services/dashboard_service.rs
//
// Agregados dos cards. Tudo recalculado do estado atual a cada chamada.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::{
    db::{Store, Tables},
    models::{
        dashboard::{DashboardSummary, InventorySummary, OrderSummary, ReturnSummary},
        inventory::StockStatus,
        orders::OrderStatus,
    },
    services::storage_service::capacity_summary,
};

#[derive(Clone)]
pub struct DashboardService {
    store: Store,
}

impl DashboardService {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get_summary(&self) -> DashboardSummary {
        let tables = self.store.read().await;
        dashboard_summary(&tables)
    }

    pub async fn inventory_summary(&self) -> InventorySummary {
        inventory_summary(&*self.store.read().await)
    }

    pub async fn order_summary(&self) -> OrderSummary {
        order_summary(&*self.store.read().await)
    }

    pub async fn return_summary(&self) -> ReturnSummary {
        return_summary(&*self.store.read().await)
    }
}

pub fn inventory_summary(tables: &Tables) -> InventorySummary {
    let products = tables.products.values();
    let with_status = |status: StockStatus| products.clone().filter(|p| p.status() == status).count();

    InventorySummary {
        total_products: tables.products.len(),
        in_stock: with_status(StockStatus::InStock),
        low_stock: with_status(StockStatus::LowStock),
        out_of_stock: with_status(StockStatus::OutOfStock),
        total_units: products.clone().map(|p| u64::from(p.quantity)).sum(),
        total_value: products.map(|p| p.stock_value()).sum(),
    }
}

pub fn order_summary(tables: &Tables) -> OrderSummary {
    // Todos os status aparecem, mesmo zerados
    let mut by_status: BTreeMap<OrderStatus, usize> =
        OrderStatus::ALL.iter().map(|s| (*s, 0)).collect();
    for order in tables.orders.values() {
        *by_status.entry(order.status).or_default() += 1;
    }

    OrderSummary {
        total_orders: tables.orders.len(),
        open_orders: tables.orders.values().filter(|o| !o.status.is_terminal()).count(),
        total_value: tables
            .orders
            .values()
            .filter(|o| o.status != OrderStatus::Cancelled)
            .map(|o| o.total())
            .sum(),
        by_status,
    }
}

pub fn return_summary(tables: &Tables) -> ReturnSummary {
    let mut by_status = BTreeMap::new();
    for rma in tables.returns.values() {
        *by_status.entry(rma.status).or_default() += 1;
    }

    ReturnSummary {
        total_returns: tables.returns.len(),
        by_status,
        total_value: tables.returns.values().map(|r| r.value).sum(),
    }
}

/// Percentual de devoluções sobre pedidos (0 quando não há pedidos).
pub fn returns_rate(returns: usize, orders: usize) -> Decimal {
    if orders == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(returns) / Decimal::from(orders) * Decimal::ONE_HUNDRED).round_dp(1)
}

pub fn dashboard_summary(tables: &Tables) -> DashboardSummary {
    let inventory = inventory_summary(tables);
    let orders = order_summary(tables);
    let returns = return_summary(tables);

    DashboardSummary {
        inventory_value: inventory.total_value,
        low_stock_products: inventory.low_stock,
        out_of_stock_products: inventory.out_of_stock,
        pending_orders: orders.by_status.get(&OrderStatus::Pending).copied().unwrap_or_default(),
        open_orders: orders.open_orders,
        orders_value: orders.total_value,
        returns_rate: returns_rate(returns.total_returns, orders.total_orders),
        returns_value: returns.total_value,
        storage: capacity_summary(tables),
        unread_notifications: tables.notifications.values().filter(|n| !n.read).count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::seed::seed_demo_data,
        models::settings::{RmaRules, WarehouseSettings},
    };

    fn seeded() -> Tables {
        let mut tables = Tables::new(WarehouseSettings {
            total_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            updated_at: None,
        });
        seed_demo_data(&mut tables).unwrap();
        tables
    }

    #[test]
    fn inventory_cards_count_each_status() {
        let summary = inventory_summary(&seeded());
        assert_eq!(summary.total_products, 5);
        assert_eq!(summary.in_stock, 3);
        assert_eq!(summary.low_stock, 1);
        assert_eq!(summary.out_of_stock, 1);
        assert_eq!(summary.total_units, 750);
        // 150x75 + 25x120 + 0x45 + 500x15 + 75x85
        assert_eq!(summary.total_value, Decimal::from(28_125));
    }

    #[test]
    fn order_cards_include_empty_statuses() {
        let summary = order_summary(&seeded());
        assert_eq!(summary.total_orders, 8);
        assert_eq!(summary.by_status[&OrderStatus::Delivered], 3);
        assert_eq!(summary.by_status[&OrderStatus::Cancelled], 0);
        assert_eq!(summary.open_orders, 5);
    }

    #[test]
    fn return_value_is_summed() {
        let summary = return_summary(&seeded());
        assert_eq!(summary.total_returns, 3);
        assert_eq!(summary.total_value, Decimal::from(135));
    }

    #[test]
    fn returns_rate_is_a_percentage() {
        assert_eq!(returns_rate(3, 8), Decimal::new(375, 1));
        assert_eq!(returns_rate(1, 0), Decimal::ZERO);
    }

    #[test]
    fn dashboard_reflects_unread_notifications_and_capacity() {
        let summary = dashboard_summary(&seeded());
        assert_eq!(summary.unread_notifications, 2);
        assert_eq!(summary.pending_orders, 1);
        assert_eq!(summary.storage.remaining, Decimal::from(80));
    }
}
