// src/models/receiving.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceivingStatus {
    InProgress,
    Completed,
    Discrepancy,
}

impl ReceivingStatus {
    /// Só remessas em andamento recebem itens ou são fechadas.
    pub fn validate_transition(self, to: ReceivingStatus) -> Result<(), AppError> {
        let allowed = self == ReceivingStatus::InProgress
            && matches!(to, ReceivingStatus::Completed | ReceivingStatus::Discrepancy);

        if allowed {
            Ok(())
        } else {
            Err(AppError::InvalidTransition {
                entity: "shipment",
                from: self.to_string(),
                to: to.to_string(),
            })
        }
    }
}

impl fmt::Display for ReceivingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReceivingStatus::InProgress => "in_progress",
            ReceivingStatus::Completed => "completed",
            ReceivingStatus::Discrepancy => "discrepancy",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingLine {
    pub sku: String,
    pub expected: u32,
    pub received: u32,
}

impl ReceivingLine {
    pub fn outstanding(&self) -> u32 {
        self.expected.saturating_sub(self.received)
    }
}

// --- Remessa de Fornecedor (PO) ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingShipment {
    pub id: String,
    pub po_number: String,
    pub supplier: String,
    pub inspector: Option<String>,
    pub arrival_date: NaiveDate,
    pub status: ReceivingStatus,
    pub lines: Vec<ReceivingLine>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReceivingShipment {
    pub fn expected_items(&self) -> u32 {
        self.lines.iter().map(|l| l.expected).sum()
    }

    pub fn received_items(&self) -> u32 {
        self.lines.iter().map(|l| l.received).sum()
    }

    pub fn is_fully_received(&self) -> bool {
        self.lines.iter().all(|l| l.received >= l.expected)
    }

    pub fn line_mut(&mut self, sku: &str) -> Option<&mut ReceivingLine> {
        self.lines.iter_mut().find(|l| l.sku == sku)
    }
}

// O que o cliente vê: remessa + totais + progresso
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentView {
    #[serde(flatten)]
    pub shipment: ReceivingShipment,
    pub expected_items: u32,
    pub received_items: u32,
    pub progress_percent: u32,
}

impl From<ReceivingShipment> for ShipmentView {
    fn from(shipment: ReceivingShipment) -> Self {
        let expected_items = shipment.expected_items();
        let received_items = shipment.received_items();
        let progress_percent = if expected_items == 0 {
            0
        } else {
            received_items.min(expected_items) * 100 / expected_items
        };
        Self {
            shipment,
            expected_items,
            received_items,
            progress_percent,
        }
    }
}

// Cards da tela de recebimento
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceivingSummary {
    pub total_shipments: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub discrepancies: usize,
    pub expected_items: u32,
    pub received_items: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shipment(lines: Vec<ReceivingLine>) -> ReceivingShipment {
        ReceivingShipment {
            id: "SH-001".into(),
            po_number: "PO-2024-001".into(),
            supplier: "Tech Corp".into(),
            inspector: None,
            arrival_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status: ReceivingStatus::InProgress,
            lines,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn line(sku: &str, expected: u32, received: u32) -> ReceivingLine {
        ReceivingLine { sku: sku.into(), expected, received }
    }

    #[test]
    fn totals_and_progress_come_from_lines() {
        let view = ShipmentView::from(shipment(vec![line("WH-001", 100, 60), line("KB-002", 50, 35)]));
        assert_eq!(view.expected_items, 150);
        assert_eq!(view.received_items, 95);
        assert_eq!(view.progress_percent, 63);
        assert!(!view.shipment.is_fully_received());
    }

    #[test]
    fn only_open_shipments_can_be_closed() {
        let open = ReceivingStatus::InProgress;
        assert!(open.validate_transition(ReceivingStatus::Completed).is_ok());
        assert!(open.validate_transition(ReceivingStatus::Discrepancy).is_ok());
        assert!(ReceivingStatus::Completed
            .validate_transition(ReceivingStatus::Discrepancy)
            .is_err());
    }
}
