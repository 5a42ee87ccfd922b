// src/services/inventory_service.rs

use chrono::Utc;

use crate::{
    common::error::AppError,
    db::{InventoryRepository, NotificationsRepository, Store, Tables},
    models::{
        inventory::{NewProduct, Product, StockAdjustmentReason, StockStatus},
        notifications::{NewNotification, NotificationCategory, NotificationKind, NotificationPriority},
    },
};

#[derive(Clone)]
pub struct InventoryService {
    store: Store,
    inventory_repo: InventoryRepository,
    notifications_repo: NotificationsRepository,
}

impl InventoryService {
    pub fn new(store: Store) -> Self {
        Self {
            inventory_repo: InventoryRepository::new(store.clone()),
            notifications_repo: NotificationsRepository::new(store.clone()),
            store,
        }
    }

    // --- CREATE PRODUCT ---
    pub async fn create_product(&self, input: NewProduct) -> Result<Product, AppError> {
        let mut tx = self.store.begin().await;

        let product = self.inventory_repo.insert_product(
            &mut tx,
            Product {
                sku: input.sku,
                name: input.name,
                category: input.category,
                description: input.description,
                quantity: input.quantity,
                safety_stock: input.safety_stock,
                unit_cost: input.unit_cost,
                location: input.location,
                supplier: input.supplier,
                last_updated: Utc::now(),
            },
        )?;

        // Produto já nasce abaixo do estoque de segurança? Avisa.
        self.alert_on_status_change(&mut tx, &product, StockStatus::InStock);

        tracing::info!(sku = %product.sku, quantity = product.quantity, "📦 Produto cadastrado");
        Ok(product)
    }

    pub async fn list_products(&self, search: Option<&str>, status: Option<StockStatus>) -> Vec<Product> {
        self.inventory_repo.list_products(search, status).await
    }

    pub async fn get_product(&self, sku: &str) -> Result<Product, AppError> {
        self.inventory_repo
            .find_product(sku)
            .await
            .ok_or_else(|| AppError::ResourceNotFound(format!("Produto {}", sku)))
    }

    // --- AJUSTE DE ESTOQUE (ENTRADA / SAÍDA) ---
    pub async fn adjust_stock(
        &self,
        sku: &str,
        delta: i64,
        reason: StockAdjustmentReason,
        notes: Option<&str>,
    ) -> Result<Product, AppError> {
        let mut tx = self.store.begin().await;
        let product = self.apply_stock_delta(&mut tx, sku, delta, reason)?;

        tracing::info!(
            sku,
            delta,
            ?reason,
            notes = notes.unwrap_or_default(),
            quantity = product.quantity,
            "Estoque ajustado"
        );
        Ok(product)
    }

    /// Verifica (sem alterar nada) se o delta pode ser aplicado.
    pub fn check_stock_delta(&self, tx: &Tables, sku: &str, delta: i64) -> Result<(), AppError> {
        let product = tx
            .products
            .get(sku)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Produto {}", sku)))?;
        new_quantity(product.quantity, delta).map(|_| ())
    }

    /// Aplica um delta dentro de uma transação já aberta.
    /// Usado também por pedidos (expedição) e devoluções (reposição).
    pub fn apply_stock_delta(
        &self,
        tx: &mut Tables,
        sku: &str,
        delta: i64,
        reason: StockAdjustmentReason,
    ) -> Result<Product, AppError> {
        let product = self.inventory_repo.product_mut(tx, sku)?;
        let previous_status = product.status();

        product.quantity = new_quantity(product.quantity, delta)?;
        product.last_updated = Utc::now();
        let updated = product.clone();

        tracing::debug!(sku, delta, ?reason, "Movimentação de estoque");
        self.alert_on_status_change(tx, &updated, previous_status);
        Ok(updated)
    }

    // Gera alerta quando o produto piora de status (em estoque -> baixo -> esgotado).
    fn alert_on_status_change(&self, tx: &mut Tables, product: &Product, previous: StockStatus) {
        let current = product.status();
        if current == previous {
            return;
        }

        let notification = match current {
            StockStatus::LowStock if previous == StockStatus::InStock => NewNotification {
                kind: NotificationKind::Warning,
                category: NotificationCategory::Inventory,
                priority: NotificationPriority::High,
                title: "Low Stock Alert".to_string(),
                message: format!(
                    "{} ({}) is running low. Only {} units remaining.",
                    product.sku, product.name, product.quantity
                ),
            },
            StockStatus::OutOfStock => NewNotification {
                kind: NotificationKind::Alert,
                category: NotificationCategory::Inventory,
                priority: NotificationPriority::High,
                title: "Out of Stock".to_string(),
                message: format!("{} ({}) is out of stock.", product.sku, product.name),
            },
            _ => return,
        };

        tracing::warn!(sku = %product.sku, status = ?current, "⚠️ Alerta de estoque");
        self.notifications_repo.insert_notification(tx, notification);
    }
}

fn new_quantity(current: u32, delta: i64) -> Result<u32, AppError> {
    let next = i64::from(current) + delta;
    if next < 0 {
        return Err(AppError::field(
            "quantity",
            "insufficient_stock",
            "Estoque insuficiente para esta saída.",
        ));
    }
    u32::try_from(next).map_err(|_| {
        AppError::field("quantity", "range", "Quantidade acima do limite suportado.")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::settings::{RmaRules, WarehouseSettings};
    use rust_decimal::Decimal;

    fn service() -> (InventoryService, Store) {
        let store = Store::new(WarehouseSettings {
            total_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            updated_at: None,
        });
        (InventoryService::new(store.clone()), store)
    }

    fn keyboard(quantity: u32) -> NewProduct {
        NewProduct {
            sku: "KB-002".into(),
            name: "Mechanical Keyboard".into(),
            category: "Electronics".into(),
            description: None,
            quantity,
            safety_stock: 30,
            unit_cost: Decimal::from(120),
            location: "A2-C1".into(),
            supplier: "KeyTech Ltd".into(),
        }
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected() {
        let (svc, _) = service();
        svc.create_product(keyboard(40)).await.unwrap();
        let err = svc.create_product(keyboard(10)).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn status_is_derived_after_each_adjustment() {
        let (svc, _) = service();
        svc.create_product(keyboard(40)).await.unwrap();

        let p = svc.adjust_stock("KB-002", -15, StockAdjustmentReason::Dispatch, None).await.unwrap();
        assert_eq!(p.quantity, 25);
        assert_eq!(p.status(), StockStatus::LowStock);

        let p = svc.adjust_stock("KB-002", -25, StockAdjustmentReason::Dispatch, None).await.unwrap();
        assert_eq!(p.status(), StockStatus::OutOfStock);

        let p = svc.adjust_stock("KB-002", 100, StockAdjustmentReason::Receiving, None).await.unwrap();
        assert_eq!(p.status(), StockStatus::InStock);
    }

    #[tokio::test]
    async fn stock_never_goes_negative() {
        let (svc, _) = service();
        svc.create_product(keyboard(5)).await.unwrap();
        let err = svc
            .adjust_stock("KB-002", -6, StockAdjustmentReason::Dispatch, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.get_product("KB-002").await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn falling_below_safety_stock_raises_a_notification() {
        let (svc, store) = service();
        svc.create_product(keyboard(40)).await.unwrap();
        svc.adjust_stock("KB-002", -20, StockAdjustmentReason::Dispatch, None).await.unwrap();

        let tables = store.read().await;
        assert_eq!(tables.notifications.len(), 1);
        let n = tables.notifications.values().next().unwrap();
        assert_eq!(n.title, "Low Stock Alert");
        assert!(!n.read);
    }

    #[tokio::test]
    async fn unknown_sku_is_not_found() {
        let (svc, _) = service();
        assert!(matches!(
            svc.get_product("NOPE").await,
            Err(AppError::ResourceNotFound(_))
        ));
    }
}
