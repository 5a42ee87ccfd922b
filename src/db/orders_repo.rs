// src/db/orders_repo.rs

use crate::{
    common::error::AppError,
    db::store::{Store, Tables},
    models::orders::{Order, OrderStatus},
};

#[derive(Clone)]
pub struct OrdersRepository {
    store: Store,
}

impl OrdersRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Pedidos mais recentes primeiro.
    pub async fn list_orders(&self, status: Option<OrderStatus>, search: Option<&str>) -> Vec<Order> {
        let tables = self.store.read().await;
        let needle = search.map(str::to_lowercase);

        let mut orders: Vec<Order> = tables
            .orders
            .values()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .filter(|o| {
                needle.as_deref().is_none_or(|n| {
                    o.order_number.to_lowercase().contains(n) || o.customer.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect();

        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }

    pub async fn find_order(&self, order_number: &str) -> Option<Order> {
        self.store.read().await.orders.get(order_number).cloned()
    }

    // --- Escrita ---

    /// Gera o próximo número no padrão `ORD-<ano>-<sequência>`.
    pub fn next_order_number(&self, tx: &mut Tables, year: i32) -> String {
        loop {
            let candidate = format!("ORD-{}-{:03}", year, tx.sequences.next_order());
            if !tx.orders.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn next_tracking_number(&self, tx: &mut Tables) -> String {
        format!("TRK{:09}", 123_456_788 + tx.sequences.next_tracking())
    }

    pub fn insert_order(&self, tx: &mut Tables, order: Order) -> Result<Order, AppError> {
        if tx.orders.contains_key(&order.order_number) {
            return Err(AppError::AlreadyExists(format!("Pedido {}", order.order_number)));
        }
        tx.orders.insert(order.order_number.clone(), order.clone());
        Ok(order)
    }

    pub fn order_mut<'t>(&self, tx: &'t mut Tables, order_number: &str) -> Result<&'t mut Order, AppError> {
        tx.orders
            .get_mut(order_number)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Pedido {}", order_number)))
    }
}
