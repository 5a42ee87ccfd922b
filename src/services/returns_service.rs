// src/services/returns_service.rs

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{NotificationsRepository, OrdersRepository, ReturnsRepository, Store},
    models::{
        inventory::StockAdjustmentReason,
        notifications::{NewNotification, NotificationCategory, NotificationKind, NotificationPriority},
        orders::OrderStatus,
        returns::{DispositionAction, ItemCondition, ReturnAuthorization, ReturnReason, ReturnStatus},
    },
    services::{disposition, inventory_service::InventoryService},
};

#[derive(Debug, Clone)]
pub struct NewReturn {
    pub order_number: String,
    pub sku: String,
    pub quantity: u32,
    pub reason: ReturnReason,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct ReturnsService {
    store: Store,
    repo: ReturnsRepository,
    orders_repo: OrdersRepository,
    notifications_repo: NotificationsRepository,
    inventory_service: InventoryService,
}

impl ReturnsService {
    pub fn new(store: Store, inventory_service: InventoryService) -> Self {
        Self {
            repo: ReturnsRepository::new(store.clone()),
            orders_repo: OrdersRepository::new(store.clone()),
            notifications_repo: NotificationsRepository::new(store.clone()),
            inventory_service,
            store,
        }
    }

    // --- ABERTURA DE RMA ---
    pub async fn create_return(&self, input: NewReturn) -> Result<ReturnAuthorization, AppError> {
        let mut tx = self.store.begin().await;

        let order = self.orders_repo.order_mut(&mut tx, &input.order_number)?.clone();
        if !matches!(order.status, OrderStatus::Shipped | OrderStatus::Delivered) {
            return Err(AppError::field(
                "orderNumber",
                "not_returnable",
                "Só é possível devolver pedidos enviados ou entregues.",
            ));
        }

        let line = order.line_for(&input.sku).ok_or_else(|| {
            AppError::field("sku", "not_on_order", "Este item não faz parte do pedido.")
        })?;

        // Não devolver mais do que foi comprado (somando RMAs anteriores não rejeitadas)
        let already_returned = self.repo.returned_quantity(&tx, &order.order_number, &line.sku);
        if input.quantity > line.quantity.saturating_sub(already_returned) {
            return Err(AppError::field(
                "quantity",
                "exceeds_order",
                "A quantidade devolvida excede a quantidade comprada.",
            ));
        }

        let now = Utc::now();
        let rma_number = self.repo.next_rma_number(&mut tx, now.year());

        let rma = self.repo.insert_return(
            &mut tx,
            ReturnAuthorization {
                rma_number,
                order_number: order.order_number.clone(),
                customer: order.customer.clone(),
                sku: line.sku.clone(),
                product_name: line.name.clone(),
                quantity: input.quantity,
                reason: input.reason,
                status: ReturnStatus::PendingInspection,
                condition: None,
                action: None,
                value: Decimal::from(input.quantity) * line.unit_price,
                order_date: order.order_date,
                return_date: now,
                notes: input.notes,
                updated_at: now,
            },
        )?;

        self.notifications_repo.insert_notification(
            &mut tx,
            NewNotification {
                kind: NotificationKind::Info,
                category: NotificationCategory::Orders,
                priority: NotificationPriority::Medium,
                title: "Return Requested".to_string(),
                message: format!(
                    "{} opened for order {} ({} x {}).",
                    rma.rma_number, rma.order_number, rma.quantity, rma.product_name
                ),
            },
        );

        tracing::info!(rma = %rma.rma_number, order = %rma.order_number, value = %rma.value, "↩️ RMA aberta");
        Ok(rma)
    }

    pub async fn list_returns(&self, status: Option<ReturnStatus>) -> Vec<ReturnAuthorization> {
        self.repo.list_returns(status).await
    }

    pub async fn get_return(&self, rma_number: &str) -> Result<ReturnAuthorization, AppError> {
        self.repo
            .find_return(rma_number)
            .await
            .ok_or_else(|| AppError::ResourceNotFound(format!("RMA {}", rma_number)))
    }

    // --- INSPEÇÃO ---
    pub async fn inspect_return(
        &self,
        rma_number: &str,
        approve: bool,
        condition: ItemCondition,
        notes: Option<String>,
    ) -> Result<ReturnAuthorization, AppError> {
        let mut tx = self.store.begin().await;
        let rma = self.repo.return_mut(&mut tx, rma_number)?;

        let to = if approve { ReturnStatus::Approved } else { ReturnStatus::Rejected };
        rma.status.validate_transition(to)?;

        rma.status = to;
        rma.condition = Some(condition);
        if notes.is_some() {
            rma.notes = notes;
        }
        rma.updated_at = Utc::now();

        tracing::info!(rma = rma_number, status = %to, ?condition, "RMA inspecionada");
        Ok(rma.clone())
    }

    // --- DESTINO (RESTOCK / REPAIR / REPLACE / SCRAP) ---

    /// Sem `override_action`, o motor de regras decide com as regras vigentes.
    pub async fn dispose_return(
        &self,
        rma_number: &str,
        override_action: Option<DispositionAction>,
    ) -> Result<ReturnAuthorization, AppError> {
        let mut tx = self.store.begin().await;
        let rules = tx.settings.rma_rules;

        let current = self.repo.return_mut(&mut tx, rma_number)?.clone();
        let action = match override_action {
            Some(action) => {
                disposition::ensure_approved(&current)?;
                action
            }
            None => disposition::select_disposition(&current, &rules)?,
        };
        let to = action.resulting_status();
        current.status.validate_transition(to)?;

        if action == DispositionAction::Restock {
            self.inventory_service.apply_stock_delta(
                &mut tx,
                &current.sku,
                i64::from(current.quantity),
                StockAdjustmentReason::ReturnRestock,
            )?;
        }

        let rma = self.repo.return_mut(&mut tx, rma_number)?;
        rma.action = Some(action);
        rma.status = to;
        rma.updated_at = Utc::now();

        tracing::info!(
            rma = rma_number,
            ?action,
            overridden = override_action.is_some(),
            "♻️ Destino da devolução aplicado"
        );
        Ok(rma.clone())
    }

    /// Só RMAs sem efeito no estoque (aguardando inspeção ou rejeitadas) podem ser excluídas.
    pub async fn delete_return(&self, rma_number: &str) -> Result<(), AppError> {
        let mut tx = self.store.begin().await;

        let status = self.repo.return_mut(&mut tx, rma_number)?.status;
        if !matches!(status, ReturnStatus::PendingInspection | ReturnStatus::Rejected) {
            tracing::warn!(rma = rma_number, %status, "Exclusão de RMA recusada");
            return Err(AppError::InvalidTransition {
                entity: "return",
                from: status.to_string(),
                to: "deleted".to_string(),
            });
        }

        let removed = self.repo.delete_return(&mut tx, rma_number)?;
        tracing::info!(rma = %removed.rma_number, status = %removed.status, "RMA excluída");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::seed::seed_demo_data,
        models::settings::{RmaRules, WarehouseSettings},
    };

    async fn service() -> (ReturnsService, Store) {
        let store = Store::new(WarehouseSettings {
            total_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            updated_at: None,
        });
        seed_demo_data(&mut *store.begin().await).unwrap();
        let inventory = InventoryService::new(store.clone());
        (ReturnsService::new(store.clone(), inventory), store)
    }

    fn request(order: &str, sku: &str, quantity: u32) -> NewReturn {
        NewReturn {
            order_number: order.into(),
            sku: sku.into(),
            quantity,
            reason: ReturnReason::NotNeeded,
            notes: None,
        }
    }

    #[tokio::test]
    async fn value_comes_from_the_order_line() {
        let (svc, _) = service().await;
        let rma = svc.create_return(request("ORD-2024-005", "TB-004", 2)).await.unwrap();

        assert_eq!(rma.status, ReturnStatus::PendingInspection);
        assert_eq!(rma.value, Decimal::from(60));
        assert_eq!(rma.customer, "Alex Wilson");
        assert!(rma.action.is_none());
    }

    #[tokio::test]
    async fn orders_not_yet_shipped_cannot_be_returned() {
        let (svc, _) = service().await;
        let err = svc.create_return(request("ORD-2024-001", "KB-002", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn cannot_return_more_than_was_bought() {
        let (svc, _) = service().await;
        // RMA-2024-001 já devolve o único WH-001 do ORD-2024-006
        let err = svc.create_return(request("ORD-2024-006", "WH-001", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = svc.create_return(request("ORD-2024-005", "SP-005", 2)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn disposition_requires_approval() {
        let (svc, _) = service().await;
        let err = svc
            .dispose_return("RMA-2024-001", Some(DispositionAction::Restock))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(
            svc.get_return("RMA-2024-001").await.unwrap().status,
            ReturnStatus::PendingInspection
        );
    }

    #[tokio::test]
    async fn approved_wrong_item_is_replaced_by_the_engine() {
        let (svc, _) = service().await;
        let rma = svc.dispose_return("RMA-2024-002", None).await.unwrap();
        assert_eq!(rma.action, Some(DispositionAction::Replace));
        assert_eq!(rma.status, ReturnStatus::Replaced);
    }

    #[tokio::test]
    async fn restocking_raises_product_quantity() {
        let (svc, store) = service().await;
        let before = store.read().await.products["TB-004"].quantity;

        let rma = svc.create_return(request("ORD-2024-005", "TB-004", 2)).await.unwrap();
        svc.inspect_return(&rma.rma_number, true, ItemCondition::Perfect, None)
            .await
            .unwrap();
        // Pedido de 2024: fora da janela, então o inspetor força a reposição
        let rma = svc
            .dispose_return(&rma.rma_number, Some(DispositionAction::Restock))
            .await
            .unwrap();

        assert_eq!(rma.status, ReturnStatus::Restocked);
        assert_eq!(store.read().await.products["TB-004"].quantity, before + 2);
    }

    #[tokio::test]
    async fn old_returns_are_scrapped_by_the_engine() {
        let (svc, _) = service().await;
        let rma = svc.create_return(request("ORD-2024-005", "WH-001", 1)).await.unwrap();
        svc.inspect_return(&rma.rma_number, true, ItemCondition::Perfect, None)
            .await
            .unwrap();

        let rma = svc.dispose_return(&rma.rma_number, None).await.unwrap();
        assert_eq!(rma.action, Some(DispositionAction::Scrap));
    }

    #[tokio::test]
    async fn rejected_returns_are_closed() {
        let (svc, _) = service().await;
        let rma = svc
            .inspect_return("RMA-2024-001", false, ItemCondition::Used, Some("Scratched".into()))
            .await
            .unwrap();
        assert_eq!(rma.status, ReturnStatus::Rejected);

        let err = svc
            .inspect_return("RMA-2024-001", true, ItemCondition::Used, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn deleted_returns_are_gone() {
        let (svc, _) = service().await;
        svc.delete_return("RMA-2024-001").await.unwrap();
        assert!(matches!(
            svc.get_return("RMA-2024-001").await,
            Err(AppError::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn disposed_returns_cannot_be_deleted_nor_returned_again() {
        let (svc, store) = service().await;
        let before = store.read().await.products["TB-004"].quantity;

        let rma = svc.create_return(request("ORD-2024-005", "TB-004", 2)).await.unwrap();
        svc.inspect_return(&rma.rma_number, true, ItemCondition::Perfect, None)
            .await
            .unwrap();
        svc.dispose_return(&rma.rma_number, Some(DispositionAction::Restock))
            .await
            .unwrap();

        let err = svc.delete_return(&rma.rma_number).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        // Os 2 itens comprados já voltaram; não há o que devolver de novo
        let err = svc.create_return(request("ORD-2024-005", "TB-004", 1)).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(store.read().await.products["TB-004"].quantity, before + 2);
    }

    #[tokio::test]
    async fn rejected_returns_free_the_quantity_and_can_be_deleted() {
        let (svc, _) = service().await;
        svc.inspect_return("RMA-2024-001", false, ItemCondition::Used, None)
            .await
            .unwrap();
        svc.delete_return("RMA-2024-001").await.unwrap();

        let rma = svc.create_return(request("ORD-2024-006", "WH-001", 1)).await.unwrap();
        assert_eq!(rma.status, ReturnStatus::PendingInspection);
    }
}
