pub mod store;
pub use store::{Store, Tables};
pub mod seed;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod orders_repo;
pub use orders_repo::OrdersRepository;
pub mod returns_repo;
pub use returns_repo::ReturnsRepository;
pub mod storage_repo;
pub use storage_repo::StorageRepository;
pub mod receiving_repo;
pub use receiving_repo::ReceivingRepository;
pub mod notifications_repo;
pub use notifications_repo::NotificationsRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
