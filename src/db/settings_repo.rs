// src/db/settings_repo.rs

use chrono::Utc;

use crate::{
    db::store::{Store, Tables},
    models::settings::{UpdateSettingsRequest, WarehouseSettings},
};

#[derive(Clone)]
pub struct SettingsRepository {
    store: Store,
}

impl SettingsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn get_settings(&self) -> WarehouseSettings {
        self.store.read().await.settings.clone()
    }

    // Atualização parcial: só os campos enviados mudam.
    pub fn update_settings(&self, tx: &mut Tables, input: UpdateSettingsRequest) -> WarehouseSettings {
        let settings = &mut tx.settings;

        if let Some(capacity) = input.total_capacity {
            settings.total_capacity = capacity;
        }
        if let Some(days) = input.restock_window_days {
            settings.rma_rules.restock_window_days = days;
        }
        if let Some(days) = input.scrap_after_days {
            settings.rma_rules.scrap_after_days = days;
        }
        settings.updated_at = Some(Utc::now());

        settings.clone()
    }
}
