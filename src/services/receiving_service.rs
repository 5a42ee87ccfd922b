// src/services/receiving_service.rs

use chrono::{NaiveDate, Utc};
use std::collections::HashSet;

use crate::{
    common::error::AppError,
    db::{NotificationsRepository, ReceivingRepository, Store},
    models::{
        inventory::StockAdjustmentReason,
        notifications::{NewNotification, NotificationCategory, NotificationKind, NotificationPriority},
        receiving::{ReceivingLine, ReceivingShipment, ReceivingStatus, ReceivingSummary},
    },
    services::inventory_service::InventoryService,
};

#[derive(Debug, Clone)]
pub struct ExpectedLine {
    pub sku: String,
    pub expected: u32,
}

#[derive(Debug, Clone)]
pub struct NewShipment {
    pub po_number: String,
    pub supplier: String,
    pub inspector: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub lines: Vec<ExpectedLine>,
}

#[derive(Clone)]
pub struct ReceivingService {
    store: Store,
    repo: ReceivingRepository,
    notifications_repo: NotificationsRepository,
    inventory_service: InventoryService,
}

impl ReceivingService {
    pub fn new(store: Store, inventory_service: InventoryService) -> Self {
        Self {
            repo: ReceivingRepository::new(store.clone()),
            notifications_repo: NotificationsRepository::new(store.clone()),
            inventory_service,
            store,
        }
    }

    // --- NOVA REMESSA ---
    pub async fn create_shipment(&self, input: NewShipment) -> Result<ReceivingShipment, AppError> {
        if input.lines.is_empty() {
            return Err(AppError::field("lines", "required", "A remessa precisa de pelo menos um item."));
        }
        let mut seen = HashSet::new();
        if !input.lines.iter().all(|l| seen.insert(l.sku.as_str())) {
            return Err(AppError::field("lines", "duplicate_sku", "Cada SKU só pode aparecer uma vez na remessa."));
        }
        if input.lines.iter().any(|l| l.expected == 0) {
            return Err(AppError::field("lines", "range", "A quantidade esperada deve ser pelo menos 1."));
        }

        let mut tx = self.store.begin().await;

        // Só entra no armazém o que está cadastrado
        if let Some(unknown) = input.lines.iter().find(|l| !tx.products.contains_key(&l.sku)) {
            return Err(AppError::ResourceNotFound(format!("Produto {}", unknown.sku)));
        }

        let now = Utc::now();
        let id = self.repo.next_shipment_id(&mut tx);
        let shipment = self.repo.insert_shipment(
            &mut tx,
            ReceivingShipment {
                id,
                po_number: input.po_number,
                supplier: input.supplier,
                inspector: input.inspector,
                arrival_date: input.arrival_date.unwrap_or_else(|| now.date_naive()),
                status: ReceivingStatus::InProgress,
                lines: input
                    .lines
                    .into_iter()
                    .map(|l| ReceivingLine { sku: l.sku, expected: l.expected, received: 0 })
                    .collect(),
                notes: input.notes,
                created_at: now,
                updated_at: now,
            },
        )?;

        tracing::info!(
            shipment = %shipment.id,
            po = %shipment.po_number,
            expected = shipment.expected_items(),
            "🚛 Remessa registrada"
        );
        Ok(shipment)
    }

    pub async fn list_shipments(&self, status: Option<ReceivingStatus>) -> Vec<ReceivingShipment> {
        self.repo.list_shipments(status).await
    }

    pub async fn get_shipment(&self, id: &str) -> Result<ReceivingShipment, AppError> {
        self.repo
            .find_shipment(id)
            .await
            .ok_or_else(|| AppError::ResourceNotFound(format!("Remessa {}", id)))
    }

    // --- CONFERÊNCIA ---

    /// Dá entrada de `quantity` unidades de um item da remessa e soma ao estoque.
    /// Quando todos os itens chegam ao esperado, a remessa é concluída.
    pub async fn receive_items(&self, id: &str, sku: &str, quantity: u32) -> Result<ReceivingShipment, AppError> {
        if quantity == 0 {
            return Err(AppError::field("quantity", "range", "A quantidade deve ser pelo menos 1."));
        }

        let mut tx = self.store.begin().await;

        let current = self.repo.shipment_mut(&mut tx, id)?.clone();
        if current.status != ReceivingStatus::InProgress {
            return Err(AppError::InvalidTransition {
                entity: "shipment",
                from: current.status.to_string(),
                to: "received".to_string(),
            });
        }

        let line = current
            .lines
            .iter()
            .find(|l| l.sku == sku)
            .ok_or_else(|| AppError::field("sku", "not_on_shipment", "Este item não faz parte da remessa."))?;
        if quantity > line.outstanding() {
            return Err(AppError::field(
                "quantity",
                "exceeds_expected",
                "A quantidade recebida excede a quantidade esperada.",
            ));
        }

        self.inventory_service.apply_stock_delta(
            &mut tx,
            sku,
            i64::from(quantity),
            StockAdjustmentReason::Receiving,
        )?;

        let shipment = self.repo.shipment_mut(&mut tx, id)?;
        if let Some(line) = shipment.line_mut(sku) {
            line.received += quantity;
        }
        shipment.updated_at = Utc::now();
        if shipment.is_fully_received() {
            shipment.status = ReceivingStatus::Completed;
        }
        let updated = shipment.clone();

        if updated.status == ReceivingStatus::Completed {
            self.notifications_repo.insert_notification(
                &mut tx,
                NewNotification {
                    kind: NotificationKind::Info,
                    category: NotificationCategory::Receiving,
                    priority: NotificationPriority::Medium,
                    title: "Shipment Received".to_string(),
                    message: format!(
                        "Shipment {} ({}) with {} items has been received.",
                        updated.id,
                        updated.po_number,
                        updated.received_items()
                    ),
                },
            );
        }

        tracing::info!(shipment = id, sku, quantity, status = %updated.status, "📥 Itens recebidos");
        Ok(updated)
    }

    /// Encerra a conferência: completa se tudo chegou, senão fica marcada como divergente.
    pub async fn close_shipment(&self, id: &str) -> Result<ReceivingShipment, AppError> {
        let mut tx = self.store.begin().await;

        let shipment = self.repo.shipment_mut(&mut tx, id)?;
        let to = if shipment.is_fully_received() {
            ReceivingStatus::Completed
        } else {
            ReceivingStatus::Discrepancy
        };
        shipment.status.validate_transition(to)?;

        shipment.status = to;
        shipment.updated_at = Utc::now();
        let closed = shipment.clone();

        if to == ReceivingStatus::Discrepancy {
            let missing: u32 = closed.lines.iter().map(ReceivingLine::outstanding).sum();
            tracing::warn!(shipment = id, missing, "Remessa fechada com divergência");
            self.notifications_repo.insert_notification(
                &mut tx,
                NewNotification {
                    kind: NotificationKind::Warning,
                    category: NotificationCategory::Receiving,
                    priority: NotificationPriority::High,
                    title: "Receiving Discrepancy".to_string(),
                    message: format!(
                        "Shipment {} ({}) was closed with {} items missing.",
                        closed.id, closed.po_number, missing
                    ),
                },
            );
        } else {
            tracing::info!(shipment = id, "Remessa concluída");
        }

        Ok(closed)
    }

    pub async fn summary(&self) -> ReceivingSummary {
        let tables = self.store.read().await;
        receiving_summary(tables.shipments.values())
    }
}

pub fn receiving_summary<'a>(shipments: impl IntoIterator<Item = &'a ReceivingShipment>) -> ReceivingSummary {
    shipments.into_iter().fold(ReceivingSummary::default(), |mut acc, s| {
        acc.total_shipments += 1;
        match s.status {
            ReceivingStatus::InProgress => acc.in_progress += 1,
            ReceivingStatus::Completed => acc.completed += 1,
            ReceivingStatus::Discrepancy => acc.discrepancies += 1,
        }
        acc.expected_items += s.expected_items();
        acc.received_items += s.received_items();
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::seed::seed_demo_data,
        models::settings::{RmaRules, WarehouseSettings},
    };
    use rust_decimal::Decimal;

    async fn service() -> (ReceivingService, Store) {
        let store = Store::new(WarehouseSettings {
            total_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            updated_at: None,
        });
        seed_demo_data(&mut *store.begin().await).unwrap();
        let inventory = InventoryService::new(store.clone());
        (ReceivingService::new(store.clone(), inventory), store)
    }

    fn shipment(po: &str, lines: &[(&str, u32)]) -> NewShipment {
        NewShipment {
            po_number: po.into(),
            supplier: "GameGear Inc".into(),
            inspector: Some("Jane Smith".into()),
            arrival_date: None,
            notes: None,
            lines: lines
                .iter()
                .map(|(sku, expected)| ExpectedLine { sku: (*sku).into(), expected: *expected })
                .collect(),
        }
    }

    #[tokio::test]
    async fn new_shipments_start_in_progress_with_nothing_received() {
        let (svc, _) = service().await;
        let created = svc.create_shipment(shipment("PO-2024-003", &[("MO-003", 20)])).await.unwrap();

        assert_eq!(created.id, "SH-003");
        assert_eq!(created.status, ReceivingStatus::InProgress);
        assert_eq!(created.received_items(), 0);
        assert_eq!(created.arrival_date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn po_numbers_and_products_are_checked() {
        let (svc, _) = service().await;
        let err = svc.create_shipment(shipment("PO-2024-001", &[("MO-003", 1)])).await.unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists(_)));

        let err = svc.create_shipment(shipment("PO-2024-009", &[("XX-404", 1)])).await.unwrap_err();
        assert!(matches!(err, AppError::ResourceNotFound(_)));

        let err = svc
            .create_shipment(shipment("PO-2024-009", &[("MO-003", 1), ("MO-003", 2)]))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = svc.create_shipment(shipment("PO-2024-009", &[])).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn receiving_adds_stock_and_completes_the_shipment() {
        let (svc, store) = service().await;
        let created = svc.create_shipment(shipment("PO-2024-003", &[("MO-003", 20)])).await.unwrap();

        let partial = svc.receive_items(&created.id, "MO-003", 5).await.unwrap();
        assert_eq!(partial.status, ReceivingStatus::InProgress);
        assert_eq!(store.read().await.products["MO-003"].quantity, 5);

        let done = svc.receive_items(&created.id, "MO-003", 15).await.unwrap();
        assert_eq!(done.status, ReceivingStatus::Completed);
        assert_eq!(store.read().await.products["MO-003"].quantity, 20);

        let tables = store.read().await;
        assert!(tables.notifications.values().any(|n| {
            n.category == NotificationCategory::Receiving && n.message.contains(&created.id)
        }));
    }

    #[tokio::test]
    async fn cannot_receive_more_than_expected() {
        let (svc, store) = service().await;
        // SH-001: WH-001 esperado 100, já recebidos 60
        let err = svc.receive_items("SH-001", "WH-001", 41).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(store.read().await.products["WH-001"].quantity, 150);

        let err = svc.receive_items("SH-001", "SP-005", 1).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn closed_shipments_take_no_more_items() {
        let (svc, _) = service().await;
        let err = svc.receive_items("SH-002", "KB-002", 1).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));

        let closed = svc.close_shipment("SH-001").await.unwrap();
        assert_eq!(closed.status, ReceivingStatus::Discrepancy);

        let err = svc.close_shipment("SH-001").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn summary_counts_seeded_shipments() {
        let (svc, _) = service().await;
        let summary = svc.summary().await;
        assert_eq!(summary.total_shipments, 2);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.expected_items, 225);
        assert_eq!(summary.received_items, 170);
    }
}
