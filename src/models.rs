pub mod dashboard;
pub mod inventory;
pub mod notifications;
pub mod orders;
pub mod receiving;
pub mod returns;
pub mod settings;
pub mod storage;
