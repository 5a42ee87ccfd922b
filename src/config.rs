// src/config.rs

use anyhow::Context;
use rust_decimal::Decimal;
use std::{env, str::FromStr, sync::Arc, time::Duration};

use crate::{
    common::i18n::I18nStore,
    db::{Store, seed::seed_demo_data},
    models::settings::{RmaRules, WarehouseSettings},
    services::{
        dashboard_service::DashboardService, inventory_service::InventoryService,
        notification_service::NotificationService, order_service::OrderService,
        receiving_service::ReceivingService, returns_service::ReturnsService,
        settings_service::SettingsService, storage_service::StorageService,
    },
};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_addr: String,
    pub warehouse_capacity: Decimal,
    pub rma_rules: RmaRules,
    pub request_timeout: Duration,
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_addr: "0.0.0.0:3000".to_string(),
            warehouse_capacity: Decimal::from(360),
            rma_rules: RmaRules::default(),
            request_timeout: Duration::from_secs(10),
            seed_demo_data: true,
        }
    }
}

impl AppConfig {
    /// Lê o `.env` (se existir) e as variáveis de ambiente. Valores inválidos impedem a subida.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let config = Self {
            server_addr: env::var("SERVER_ADDR").unwrap_or(defaults.server_addr),
            warehouse_capacity: var_or("WAREHOUSE_CAPACITY_M2", defaults.warehouse_capacity)?,
            rma_rules: RmaRules {
                restock_window_days: var_or("RMA_RESTOCK_WINDOW_DAYS", defaults.rma_rules.restock_window_days)?,
                scrap_after_days: var_or("RMA_SCRAP_AFTER_DAYS", defaults.rma_rules.scrap_after_days)?,
            },
            request_timeout: Duration::from_secs(var_or("REQUEST_TIMEOUT_SECS", 10u64)?),
            seed_demo_data: var_or("SEED_DEMO_DATA", defaults.seed_demo_data)?,
        };

        anyhow::ensure!(
            config.warehouse_capacity > Decimal::ZERO,
            "WAREHOUSE_CAPACITY_M2 deve ser positivo"
        );
        anyhow::ensure!(
            config.rma_rules.restock_window_days <= config.rma_rules.scrap_after_days,
            "RMA_RESTOCK_WINDOW_DAYS não pode ultrapassar RMA_SCRAP_AFTER_DAYS"
        );

        Ok(config)
    }

    pub fn warehouse_settings(&self) -> WarehouseSettings {
        WarehouseSettings {
            total_capacity: self.warehouse_capacity,
            rma_rules: self.rma_rules,
            updated_at: None,
        }
    }
}

fn var_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Valor inválido para {}: {:?}", key, raw)),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
    pub i18n_store: Arc<I18nStore>,

    // --- Serviços ---
    pub inventory_service: InventoryService,
    pub order_service: OrderService,
    pub returns_service: ReturnsService,
    pub receiving_service: ReceivingService,
    pub storage_service: StorageService,
    pub notification_service: NotificationService,
    pub dashboard_service: DashboardService,
    pub settings_service: SettingsService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let store = Store::new(config.warehouse_settings());

        if config.seed_demo_data {
            seed_demo_data(&mut *store.begin().await).context("Falha ao carregar dados de demonstração")?;
        }

        let i18n_store = I18nStore::load().context("Falha ao carregar traduções")?;

        // --- Monta o gráfico de dependências ---
        let inventory_service = InventoryService::new(store.clone());
        let order_service = OrderService::new(store.clone(), inventory_service.clone());
        let returns_service = ReturnsService::new(store.clone(), inventory_service.clone());
        let receiving_service = ReceivingService::new(store.clone(), inventory_service.clone());

        Ok(Self {
            config: Arc::new(config),
            i18n_store: Arc::new(i18n_store),
            inventory_service,
            order_service,
            returns_service,
            receiving_service,
            storage_service: StorageService::new(store.clone()),
            notification_service: NotificationService::new(store.clone()),
            dashboard_service: DashboardService::new(store.clone()),
            settings_service: SettingsService::new(store.clone()),
            store,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_variables_use_defaults() {
        assert_eq!(var_or("WAREHOUSE_TEST_UNSET_VAR", 42u64).unwrap(), 42);
    }

    #[tokio::test]
    async fn state_without_seed_starts_empty() {
        let config = AppConfig {
            seed_demo_data: false,
            ..AppConfig::default()
        };
        let state = AppState::new(config).await.unwrap();
        assert!(state.store.read().await.products.is_empty());
        assert_eq!(
            state.settings_service.get_settings().await.total_capacity,
            Decimal::from(360)
        );
    }
}
