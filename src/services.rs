pub mod dashboard_service;
pub mod disposition;
pub mod inventory_service;
pub mod notification_service;
pub mod order_service;
pub mod receiving_service;
pub mod returns_service;
pub mod settings_service;
pub mod storage_service;
