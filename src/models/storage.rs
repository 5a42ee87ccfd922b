// src/models/storage.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    Shelves,
    Floor,
    Cold,
    Hazardous,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageRequestStatus {
    Pending,
    Approved,
    Declined,
}

impl StorageRequestStatus {
    pub fn validate_transition(self, to: StorageRequestStatus) -> Result<(), AppError> {
        let allowed = self == StorageRequestStatus::Pending
            && matches!(to, StorageRequestStatus::Approved | StorageRequestStatus::Declined);

        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                entity: "storage_request",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

impl fmt::Display for StorageRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StorageRequestStatus::Pending => "pending",
            StorageRequestStatus::Approved => "approved",
            StorageRequestStatus::Declined => "declined",
        };
        f.write_str(s)
    }
}

// --- Solicitação de Espaço ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StorageRequest {
    pub id: String,
    pub item_name: String,
    pub product_id: Option<String>,
    pub quantity: u32,
    pub requested_space: Decimal, // m²
    pub storage_type: StorageType,
    pub special_handling: bool,
    pub requirement: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub duration_days: Option<u32>,
    pub notes: Option<String>,
    pub status: StorageRequestStatus,
    pub created_at: DateTime<Utc>,
    pub decided_at: Option<DateTime<Utc>>,
}

// Visão de capacidade do armazém (cards "Allocated" / "Remaining")
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CapacitySummary {
    pub total_capacity: Decimal,
    pub allocated: Decimal,
    pub remaining: Decimal,
    pub utilization_percent: Decimal,
    pub pending_requests: usize,
    pub approved_requests: usize,
    pub declined_requests: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_pending_requests_can_be_decided() {
        let pending = StorageRequestStatus::Pending;
        assert!(pending.validate_transition(StorageRequestStatus::Approved).is_ok());
        assert!(pending.validate_transition(StorageRequestStatus::Declined).is_ok());
        assert!(pending.validate_transition(StorageRequestStatus::Pending).is_err());
        assert!(StorageRequestStatus::Declined
            .validate_transition(StorageRequestStatus::Approved)
            .is_err());
        assert!(StorageRequestStatus::Approved
            .validate_transition(StorageRequestStatus::Declined)
            .is_err());
    }
}
