// src/services/storage_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::{NotificationsRepository, StorageRepository, Store, Tables},
    models::{
        notifications::{NewNotification, NotificationCategory, NotificationKind, NotificationPriority},
        storage::{CapacitySummary, StorageRequest, StorageRequestStatus, StorageType},
    },
};

#[derive(Debug, Clone)]
pub struct NewStorageRequest {
    pub item_name: String,
    pub product_id: Option<String>,
    pub quantity: u32,
    pub requested_space: Decimal,
    pub storage_type: StorageType,
    pub special_handling: bool,
    pub requirement: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub duration_days: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct StorageService {
    store: Store,
    repo: StorageRepository,
    notifications_repo: NotificationsRepository,
}

impl StorageService {
    pub fn new(store: Store) -> Self {
        Self {
            repo: StorageRepository::new(store.clone()),
            notifications_repo: NotificationsRepository::new(store.clone()),
            store,
        }
    }

    // --- SOLICITAÇÃO ---
    pub async fn submit_request(&self, input: NewStorageRequest) -> Result<StorageRequest, AppError> {
        let requirement = match (input.special_handling, input.requirement) {
            (true, Some(r)) if !r.trim().is_empty() => Some(r),
            (true, _) => {
                return Err(AppError::field(
                    "requirement",
                    "required",
                    "Informe o requisito de manuseio especial.",
                ));
            }
            (false, _) => None,
        };

        let mut tx = self.store.begin().await;

        if let Some(product_id) = &input.product_id
            && !tx.products.contains_key(product_id)
        {
            return Err(AppError::field("productId", "unknown_product", "Produto não cadastrado."));
        }

        self.ensure_fits(&tx, input.requested_space, "submit")?;

        let id = self.repo.next_request_id(&mut tx);
        let request = self.repo.insert_request(
            &mut tx,
            StorageRequest {
                id,
                item_name: input.item_name,
                product_id: input.product_id,
                quantity: input.quantity,
                requested_space: input.requested_space,
                storage_type: input.storage_type,
                special_handling: input.special_handling,
                requirement,
                arrival_date: input.arrival_date,
                duration_days: input.duration_days,
                notes: input.notes,
                status: StorageRequestStatus::Pending,
                created_at: Utc::now(),
                decided_at: None,
            },
        )?;

        tracing::info!(id = %request.id, space = %request.requested_space, "🏗️ Solicitação de espaço registrada");
        Ok(request)
    }

    pub async fn list_requests(&self, status: Option<StorageRequestStatus>) -> Vec<StorageRequest> {
        self.repo.list_requests(status).await
    }

    // --- DECISÃO ---

    /// A capacidade é conferida de novo: outras aprovações podem ter ocupado o espaço.
    pub async fn approve_request(&self, id: &str) -> Result<StorageRequest, AppError> {
        self.decide(id, StorageRequestStatus::Approved).await
    }

    pub async fn decline_request(&self, id: &str) -> Result<StorageRequest, AppError> {
        self.decide(id, StorageRequestStatus::Declined).await
    }

    async fn decide(&self, id: &str, to: StorageRequestStatus) -> Result<StorageRequest, AppError> {
        let mut tx = self.store.begin().await;

        let current = self.repo.request_mut(&mut tx, id)?.clone();
        current.status.validate_transition(to)?;
        if to == StorageRequestStatus::Approved {
            self.ensure_fits(&tx, current.requested_space, "approve")?;
        }

        let request = self.repo.request_mut(&mut tx, id)?;
        request.status = to;
        request.decided_at = Some(Utc::now());
        let decided = request.clone();

        let (kind, verb) = match to {
            StorageRequestStatus::Approved => (NotificationKind::Success, "approved"),
            _ => (NotificationKind::Info, "declined"),
        };
        self.notifications_repo.insert_notification(
            &mut tx,
            NewNotification {
                kind,
                category: NotificationCategory::Receiving,
                priority: NotificationPriority::Medium,
                title: "Storage Request Updated".to_string(),
                message: format!(
                    "Storage request {} ({} m²) was {}.",
                    decided.id, decided.requested_space, verb
                ),
            },
        );

        tracing::info!(id, status = %to, "Solicitação de espaço decidida");
        Ok(decided)
    }

    fn ensure_fits(&self, tables: &Tables, requested: Decimal, stage: &str) -> Result<(), AppError> {
        let available = tables.settings.total_capacity - self.repo.allocated_space(tables);
        if requested > available {
            tracing::warn!(%requested, %available, stage, "Capacidade do armazém excedida");
            return Err(AppError::CapacityExceeded { requested, available });
        }
        Ok(())
    }

    // --- CAPACIDADE ---
    pub async fn capacity_summary(&self) -> CapacitySummary {
        let tables = self.store.read().await;
        capacity_summary(&tables)
    }
}

/// Cards de capacidade calculados a partir do estado atual.
pub fn capacity_summary(tables: &Tables) -> CapacitySummary {
    let requests = tables.storage_requests.values();
    let total_capacity = tables.settings.total_capacity;
    let allocated = crate::db::storage_repo::allocated_space(requests.clone());

    let count = |status: StorageRequestStatus| requests.clone().filter(|r| r.status == status).count();

    let utilization_percent = if total_capacity.is_zero() {
        Decimal::ZERO
    } else {
        (allocated / total_capacity * Decimal::ONE_HUNDRED).round_dp(2)
    };

    CapacitySummary {
        total_capacity,
        allocated,
        remaining: total_capacity - allocated,
        utilization_percent,
        pending_requests: count(StorageRequestStatus::Pending),
        approved_requests: count(StorageRequestStatus::Approved),
        declined_requests: count(StorageRequestStatus::Declined),
    }
}
