// src/services/settings_service.rs

use crate::{
    common::error::AppError,
    db::{SettingsRepository, Store},
    models::settings::{UpdateSettingsRequest, WarehouseSettings},
    services::storage_service::capacity_summary,
};

#[derive(Clone)]
pub struct SettingsService {
    store: Store,
    repo: SettingsRepository,
}

impl SettingsService {
    pub fn new(store: Store) -> Self {
        Self {
            repo: SettingsRepository::new(store.clone()),
            store,
        }
    }

    pub async fn get_settings(&self) -> WarehouseSettings {
        self.repo.get_settings().await
    }

    pub async fn update_settings(&self, input: UpdateSettingsRequest) -> Result<WarehouseSettings, AppError> {
        let mut tx = self.store.begin().await;

        // Não dá para encolher o armazém abaixo do que já foi aprovado
        if let Some(capacity) = input.total_capacity {
            let allocated = capacity_summary(&tx).allocated;
            if capacity < allocated {
                return Err(AppError::field(
                    "totalCapacity",
                    "below_allocated",
                    "A capacidade não pode ser menor que o espaço já alocado.",
                ));
            }
        }

        let scrap_after = input.scrap_after_days.unwrap_or(tx.settings.rma_rules.scrap_after_days);
        let restock_window = input
            .restock_window_days
            .unwrap_or(tx.settings.rma_rules.restock_window_days);
        if restock_window > scrap_after {
            return Err(AppError::field(
                "restockWindowDays",
                "exceeds_scrap_window",
                "A janela de reposição não pode ultrapassar o prazo de descarte.",
            ));
        }

        let settings = self.repo.update_settings(&mut tx, input);
        tracing::info!(
            capacity = %settings.total_capacity,
            restock_window_days = settings.rma_rules.restock_window_days,
            scrap_after_days = settings.rma_rules.scrap_after_days,
            "⚙️ Configurações atualizadas"
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::seed::seed_demo_data, models::settings::RmaRules};
    use rust_decimal::Decimal;

    async fn service() -> SettingsService {
        let store = Store::new(WarehouseSettings {
            total_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            updated_at: None,
        });
        seed_demo_data(&mut *store.begin().await).unwrap();
        SettingsService::new(store)
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let svc = service().await;
        let settings = svc
            .update_settings(UpdateSettingsRequest {
                total_capacity: Some(Decimal::from(500)),
                restock_window_days: None,
                scrap_after_days: None,
            })
            .await
            .unwrap();

        assert_eq!(settings.total_capacity, Decimal::from(500));
        assert_eq!(settings.rma_rules, RmaRules::default());
        assert!(settings.updated_at.is_some());
    }

    #[tokio::test]
    async fn capacity_cannot_drop_below_allocated_space() {
        let svc = service().await;
        let err = svc
            .update_settings(UpdateSettingsRequest {
                total_capacity: Some(Decimal::from(200)),
                restock_window_days: None,
                scrap_after_days: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        assert_eq!(svc.get_settings().await.total_capacity, Decimal::from(360));
    }

    #[tokio::test]
    async fn restock_window_must_fit_inside_scrap_window() {
        let svc = service().await;
        let result = svc
            .update_settings(UpdateSettingsRequest {
                total_capacity: None,
                restock_window_days: Some(200),
                scrap_after_days: None,
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }
}
