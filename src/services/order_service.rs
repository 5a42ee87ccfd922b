// src/services/order_service.rs

use chrono::{DateTime, Datelike, Duration, Utc};
use std::collections::HashSet;

use crate::{
    common::error::AppError,
    db::{NotificationsRepository, OrdersRepository, ReturnsRepository, Store, Tables},
    models::{
        inventory::StockAdjustmentReason,
        notifications::{NewNotification, NotificationCategory, NotificationKind, NotificationPriority},
        orders::{Order, OrderLine, OrderPriority, OrderStatus},
    },
    services::inventory_service::InventoryService,
};

// Prazo padrão de entrega quando o cliente não informa
const DEFAULT_DUE_DAYS: i64 = 3;

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer: String,
    pub customer_email: Option<String>,
    pub shipping_address: Option<String>,
    pub notes: Option<String>,
    pub priority: OrderPriority,
    pub due_date: Option<DateTime<Utc>>,
    pub lines: Vec<OrderLine>,
}

#[derive(Clone)]
pub struct OrderService {
    store: Store,
    repo: OrdersRepository,
    inventory_service: InventoryService,
    notifications_repo: NotificationsRepository,
    returns_repo: ReturnsRepository,
}

impl OrderService {
    pub fn new(store: Store, inventory_service: InventoryService) -> Self {
        Self {
            repo: OrdersRepository::new(store.clone()),
            notifications_repo: NotificationsRepository::new(store.clone()),
            returns_repo: ReturnsRepository::new(store.clone()),
            inventory_service,
            store,
        }
    }

    // --- PEDIDOS ---

    pub async fn create_order(&self, input: NewOrder) -> Result<Order, AppError> {
        ensure_unique_skus(&input.lines)?;

        let now = Utc::now();
        let due_date = input.due_date.unwrap_or(now + Duration::days(DEFAULT_DUE_DAYS));
        if due_date < now {
            return Err(AppError::field("dueDate", "past_date", "A data de entrega não pode estar no passado."));
        }

        let mut tx = self.store.begin().await;
        let order_number = self.repo.next_order_number(&mut tx, now.year());

        let order = self.repo.insert_order(
            &mut tx,
            Order {
                order_number,
                customer: input.customer,
                customer_email: input.customer_email,
                shipping_address: input.shipping_address,
                notes: input.notes,
                priority: input.priority,
                lines: input.lines,
                status: OrderStatus::Pending,
                order_date: now,
                due_date,
                tracking_number: None,
                updated_at: now,
            },
        )?;

        tracing::info!(order = %order.order_number, total = %order.total(), "🧾 Pedido criado");
        Ok(order)
    }

    pub async fn list_orders(&self, status: Option<OrderStatus>, search: Option<&str>) -> Vec<Order> {
        self.repo.list_orders(status, search).await
    }

    pub async fn get_order(&self, order_number: &str) -> Result<Order, AppError> {
        self.repo
            .find_order(order_number)
            .await
            .ok_or_else(|| AppError::ResourceNotFound(format!("Pedido {}", order_number)))
    }

    // --- ITENS ---

    pub async fn add_line(&self, order_number: &str, line: OrderLine) -> Result<Order, AppError> {
        let mut tx = self.store.begin().await;
        let order = self.editable_order(&mut tx, order_number)?;

        if order.line_for(&line.sku).is_some() {
            return Err(AppError::AlreadyExists(format!(
                "Item {} no pedido {}",
                line.sku, order_number
            )));
        }

        order.lines.push(line);
        order.updated_at = Utc::now();

        tracing::info!(order = order_number, total = %order.total(), "Item adicionado ao pedido");
        Ok(order.clone())
    }

    pub async fn remove_line(&self, order_number: &str, sku: &str) -> Result<Order, AppError> {
        let mut tx = self.store.begin().await;
        let order = self.editable_order(&mut tx, order_number)?;

        if order.line_for(sku).is_none() {
            return Err(AppError::ResourceNotFound(format!(
                "Item {} no pedido {}",
                sku, order_number
            )));
        }
        if order.lines.len() == 1 {
            return Err(AppError::field(
                "lines",
                "last_line",
                "O pedido precisa manter pelo menos um item.",
            ));
        }

        order.lines.retain(|l| l.sku != sku);
        order.updated_at = Utc::now();

        tracing::info!(order = order_number, sku, total = %order.total(), "Item removido do pedido");
        Ok(order.clone())
    }

    fn editable_order<'t>(&self, tx: &'t mut Tables, order_number: &str) -> Result<&'t mut Order, AppError> {
        let order = self.repo.order_mut(tx, order_number)?;
        if !order.status.accepts_line_changes() {
            return Err(AppError::OrderLocked {
                order_number: order_number.to_string(),
                status: order.status.to_string(),
            });
        }
        Ok(order)
    }

    // --- TRANSIÇÃO ---

    /// Move o pedido para `to`. Nada é alterado se a transição for inválida.
    /// - `shipped`: baixa o estoque dos itens cadastrados e atribui o rastreio
    /// - `cancelled` a partir de `shipped`: devolve os itens ao estoque, desde que
    ///   nenhuma RMA não rejeitada exista para o pedido
    pub async fn transition_order(
        &self,
        order_number: &str,
        to: OrderStatus,
        tracking_number: Option<String>,
    ) -> Result<Order, AppError> {
        let mut tx = self.store.begin().await;

        let current = self.repo.order_mut(&mut tx, order_number)?.clone();

        if let Err(e) = current.status.validate_transition(to) {
            tracing::warn!(order = order_number, from = %current.status, %to, "Transição rejeitada");
            return Err(e);
        }
        if tracking_number.is_some() && to != OrderStatus::Shipped {
            return Err(AppError::field(
                "trackingNumber",
                "unexpected",
                "O código de rastreio só é informado na expedição.",
            ));
        }

        // 1. Regra de Estoque
        let stocked_lines: Vec<&OrderLine> = current
            .lines
            .iter()
            .filter(|l| tx.products.contains_key(&l.sku))
            .collect();

        match (current.status, to) {
            (_, OrderStatus::Shipped) => {
                // Confere tudo antes de baixar qualquer item
                for line in &stocked_lines {
                    self.inventory_service
                        .check_stock_delta(&tx, &line.sku, -i64::from(line.quantity))?;
                }
                for line in &stocked_lines {
                    self.inventory_service.apply_stock_delta(
                        &mut tx,
                        &line.sku,
                        -i64::from(line.quantity),
                        StockAdjustmentReason::Dispatch,
                    )?;
                }
            }
            (OrderStatus::Shipped, OrderStatus::Cancelled) => {
                // Itens já devolvidos por RMA voltariam ao estoque duas vezes
                let open_returns = self.returns_repo.active_returns_for_order(&tx, order_number);
                if open_returns > 0 {
                    tracing::warn!(order = order_number, open_returns, "Cancelamento recusado: pedido com devoluções");
                    return Err(AppError::InvalidTransition {
                        entity: "order",
                        from: current.status.to_string(),
                        to: to.to_string(),
                    });
                }
                for line in &stocked_lines {
                    self.inventory_service.apply_stock_delta(
                        &mut tx,
                        &line.sku,
                        i64::from(line.quantity),
                        StockAdjustmentReason::Correction,
                    )?;
                }
            }
            _ => {}
        }

        // 2. Rastreio: existe se e somente se shipped/delivered
        let tracking = match to {
            OrderStatus::Shipped => Some(match tracking_number {
                Some(t) => t,
                None => self.repo.next_tracking_number(&mut tx),
            }),
            OrderStatus::Delivered => current.tracking_number.clone(),
            _ => None,
        };

        let order = self.repo.order_mut(&mut tx, order_number)?;
        order.status = to;
        order.tracking_number = tracking;
        order.updated_at = Utc::now();
        let updated = order.clone();

        // 3. Notificação
        if to == OrderStatus::Shipped {
            self.notifications_repo.insert_notification(
                &mut tx,
                NewNotification {
                    kind: NotificationKind::Success,
                    category: NotificationCategory::Orders,
                    priority: NotificationPriority::Medium,
                    title: "Order Shipped".to_string(),
                    message: format!(
                        "Order {} has been shipped with tracking {}.",
                        updated.order_number,
                        updated.tracking_number.as_deref().unwrap_or_default()
                    ),
                },
            );
        }

        tracing::info!(order = order_number, from = %current.status, %to, "🚚 Pedido movido");
        Ok(updated)
    }
}

fn ensure_unique_skus(lines: &[OrderLine]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    if lines.iter().all(|l| seen.insert(l.sku.as_str())) {
        Ok(())
    } else {
        Err(AppError::field("lines", "duplicate_sku", "Cada SKU só pode aparecer uma vez no pedido."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::seed::seed_demo_data,
        models::settings::{RmaRules, WarehouseSettings},
    };
    use rust_decimal::Decimal;

    async fn service() -> (OrderService, Store) {
        let store = Store::new(WarehouseSettings {
            total_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            updated_at: None,
        });
        seed_demo_data(&mut *store.begin().await).unwrap();
        let inventory = InventoryService::new(store.clone());
        (OrderService::new(store.clone(), inventory), store)
    }

    fn new_order(lines: Vec<OrderLine>) -> NewOrder {
        NewOrder {
            customer: "Ada Lovelace".into(),
            customer_email: None,
            shipping_address: None,
            notes: None,
            priority: OrderPriority::Urgent,
            due_date: None,
            lines,
        }
    }

    fn line(sku: &str, quantity: u32, unit_price: Decimal) -> OrderLine {
        OrderLine { sku: sku.into(), name: sku.into(), quantity, unit_price }
    }

    #[tokio::test]
    async fn new_orders_start_pending_with_computed_total() {
        let (svc, _) = service().await;
        let order = svc
            .create_order(new_order(vec![line("WH-001", 2, Decimal::new(2999, 2))]))
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.total(), Decimal::new(5998, 2));
        assert!(order.tracking_number.is_none());
    }

    #[tokio::test]
    async fn duplicate_skus_are_rejected() {
        let (svc, _) = service().await;
        let err = svc
            .create_order(new_order(vec![
                line("WH-001", 1, Decimal::ONE),
                line("WH-001", 2, Decimal::ONE),
            ]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn skipping_to_shipped_is_rejected_without_mutation() {
        let (svc, _) = service().await;
        let err = svc
            .transition_order("ORD-2024-001", OrderStatus::Shipped, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        let order = svc.get_order("ORD-2024-001").await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.tracking_number.is_none());
    }

    #[tokio::test]
    async fn full_lifecycle_keeps_tracking_invariant_and_deducts_stock() {
        let (svc, store) = service().await;
        let created = svc
            .create_order(new_order(vec![line("WH-001", 10, Decimal::from(95))]))
            .await
            .unwrap();
        let number = created.order_number.clone();

        for step in [OrderStatus::Processing, OrderStatus::Picking, OrderStatus::Packed] {
            let order = svc.transition_order(&number, step, None).await.unwrap();
            assert!(order.tracking_number.is_none());
        }

        let shipped = svc.transition_order(&number, OrderStatus::Shipped, None).await.unwrap();
        assert!(shipped.tracking_number.as_deref().unwrap().starts_with("TRK"));
        assert_eq!(store.read().await.products["WH-001"].quantity, 140);

        let delivered = svc.transition_order(&number, OrderStatus::Delivered, None).await.unwrap();
        assert_eq!(delivered.tracking_number, shipped.tracking_number);
    }

    #[tokio::test]
    async fn shipping_without_enough_stock_fails_atomically() {
        let (svc, store) = service().await;
        // ORD-2024-004 está "packed" e pede 2 Gaming Mouse (estoque 0)
        let err = svc
            .transition_order("ORD-2024-004", OrderStatus::Shipped, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let tables = store.read().await;
        assert_eq!(tables.orders["ORD-2024-004"].status, OrderStatus::Packed);
        assert_eq!(tables.products["MO-003"].quantity, 0);
    }

    #[tokio::test]
    async fn cancelling_a_shipped_order_returns_stock_and_clears_tracking() {
        let (svc, store) = service().await;
        let before = store.read().await.products["TB-004"].quantity;

        let order = svc
            .transition_order("ORD-2024-005", OrderStatus::Cancelled, None)
            .await
            .unwrap();
        assert!(order.tracking_number.is_none());
        assert_eq!(store.read().await.products["TB-004"].quantity, before + 2);
    }

    #[tokio::test]
    async fn shipped_orders_with_returns_cannot_be_cancelled() {
        let (svc, store) = service().await;
        let returns = crate::services::returns_service::ReturnsService::new(
            store.clone(),
            InventoryService::new(store.clone()),
        );
        returns
            .create_return(crate::services::returns_service::NewReturn {
                order_number: "ORD-2024-005".into(),
                sku: "TB-004".into(),
                quantity: 2,
                reason: crate::models::returns::ReturnReason::NotNeeded,
                notes: None,
            })
            .await
            .unwrap();
        let before = store.read().await.products["TB-004"].quantity;

        let err = svc
            .transition_order("ORD-2024-005", OrderStatus::Cancelled, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        let tables = store.read().await;
        assert_eq!(tables.orders["ORD-2024-005"].status, OrderStatus::Shipped);
        assert_eq!(tables.products["TB-004"].quantity, before);
    }

    #[tokio::test]
    async fn delivered_orders_cannot_be_cancelled() {
        let (svc, _) = service().await;
        let err = svc
            .transition_order("ORD-2024-006", OrderStatus::Cancelled, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn line_changes_recompute_total_until_picking() {
        let (svc, _) = service().await;
        let order = svc
            .add_line("ORD-2024-002", line("TB-004", 2, Decimal::from(15)))
            .await
            .unwrap();
        assert_eq!(order.total(), Decimal::from(150));

        let order = svc.remove_line("ORD-2024-002", "KB-002").await.unwrap();
        assert_eq!(order.total(), Decimal::from(30));

        let err = svc
            .add_line("ORD-2024-003", line("KB-002", 1, Decimal::from(120)))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::OrderLocked { .. }));
    }

    #[tokio::test]
    async fn the_last_line_cannot_be_removed() {
        let (svc, _) = service().await;
        // ORD-2024-002 tem um único item
        let err = svc.remove_line("ORD-2024-002", "KB-002").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.get_order("ORD-2024-002").await.unwrap().lines.len(), 1);

        let err = svc.remove_line("ORD-2024-002", "XX-999").await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));
    }
}
