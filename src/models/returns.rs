// src/models/returns.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReturnReason {
    Defective,
    WrongItem,
    Damaged,
    NotNeeded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnStatus {
    PendingInspection,
    Approved,
    Rejected,
    Restocked,
    Repaired,
    Replaced,
    Scrapped,
}

impl ReturnStatus {
    pub fn validate_transition(self, to: ReturnStatus) -> Result<(), AppError> {
        use ReturnStatus::*;

        let allowed = match self {
            PendingInspection => matches!(to, Approved | Rejected),
            Approved => matches!(to, Restocked | Repaired | Replaced | Scrapped),
            Rejected | Restocked | Repaired | Replaced | Scrapped => false,
        };

        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                entity: "return",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }

    pub fn is_closed(self) -> bool {
        !matches!(self, ReturnStatus::PendingInspection | ReturnStatus::Approved)
    }
}

impl fmt::Display for ReturnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReturnStatus::PendingInspection => "pending_inspection",
            ReturnStatus::Approved => "approved",
            ReturnStatus::Rejected => "rejected",
            ReturnStatus::Restocked => "restocked",
            ReturnStatus::Repaired => "repaired",
            ReturnStatus::Replaced => "replaced",
            ReturnStatus::Scrapped => "scrapped",
        };
        f.write_str(s)
    }
}

// Grau de conservação registrado na inspeção
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCondition {
    Perfect,
    Used,
    Defective,
    DamagedBeyondRepair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispositionAction {
    Restock,
    Repair,
    Replace,
    Scrap,
}

impl DispositionAction {
    pub fn resulting_status(self) -> ReturnStatus {
        match self {
            DispositionAction::Restock => ReturnStatus::Restocked,
            DispositionAction::Repair => ReturnStatus::Repaired,
            DispositionAction::Replace => ReturnStatus::Replaced,
            DispositionAction::Scrap => ReturnStatus::Scrapped,
        }
    }
}

// --- RMA ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnAuthorization {
    pub rma_number: String,
    pub order_number: String,
    pub customer: String,
    pub sku: String,
    pub product_name: String,
    pub quantity: u32,
    pub reason: ReturnReason,
    pub status: ReturnStatus,
    pub condition: Option<ItemCondition>,
    pub action: Option<DispositionAction>,
    pub value: Decimal,
    pub order_date: DateTime<Utc>,
    pub return_date: DateTime<Utc>,
    pub notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}

impl ReturnAuthorization {
    /// Dias entre a compra e a devolução.
    pub fn age_in_days(&self) -> i64 {
        (self.return_date - self.order_date).num_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspection_leads_to_approval_or_rejection() {
        let from = ReturnStatus::PendingInspection;
        assert!(from.validate_transition(ReturnStatus::Approved).is_ok());
        assert!(from.validate_transition(ReturnStatus::Rejected).is_ok());
        assert!(from.validate_transition(ReturnStatus::Restocked).is_err());
    }

    #[test]
    fn dispositions_require_approval() {
        for action in [
            DispositionAction::Restock,
            DispositionAction::Repair,
            DispositionAction::Replace,
            DispositionAction::Scrap,
        ] {
            let to = action.resulting_status();
            assert!(ReturnStatus::Approved.validate_transition(to).is_ok());
            assert!(ReturnStatus::PendingInspection.validate_transition(to).is_err());
            assert!(ReturnStatus::Rejected.validate_transition(to).is_err());
        }
    }

    #[test]
    fn reasons_use_kebab_case_on_the_wire() {
        let reason: ReturnReason = serde_json::from_str("\"wrong-item\"").unwrap();
        assert_eq!(reason, ReturnReason::WrongItem);
        assert_eq!(serde_json::to_string(&ReturnReason::NotNeeded).unwrap(), "\"not-needed\"");
    }
}
