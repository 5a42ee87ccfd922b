// src/db/receiving_repo.rs

use crate::{
    common::error::AppError,
    db::store::{Store, Tables},
    models::receiving::{ReceivingShipment, ReceivingStatus},
};

#[derive(Clone)]
pub struct ReceivingRepository {
    store: Store,
}

impl ReceivingRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    /// Remessas mais recentes primeiro (data de chegada).
    pub async fn list_shipments(&self, status: Option<ReceivingStatus>) -> Vec<ReceivingShipment> {
        let tables = self.store.read().await;
        let mut shipments: Vec<ReceivingShipment> = tables
            .shipments
            .values()
            .filter(|s| status.is_none_or(|st| s.status == st))
            .cloned()
            .collect();

        shipments.sort_by(|a, b| b.arrival_date.cmp(&a.arrival_date).then_with(|| b.id.cmp(&a.id)));
        shipments
    }

    pub async fn find_shipment(&self, id: &str) -> Option<ReceivingShipment> {
        self.store.read().await.shipments.get(id).cloned()
    }

    // --- Escrita ---

    pub fn next_shipment_id(&self, tx: &mut Tables) -> String {
        loop {
            let candidate = format!("SH-{:03}", tx.sequences.next_shipment());
            if !tx.shipments.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    /// O número do PO identifica a remessa para o fornecedor: não pode repetir.
    pub fn insert_shipment(
        &self,
        tx: &mut Tables,
        shipment: ReceivingShipment,
    ) -> Result<ReceivingShipment, AppError> {
        if tx.shipments.values().any(|s| s.po_number == shipment.po_number) {
            return Err(AppError::AlreadyExists(format!("PO {}", shipment.po_number)));
        }
        tx.shipments.insert(shipment.id.clone(), shipment.clone());
        Ok(shipment)
    }

    pub fn shipment_mut<'t>(
        &self,
        tx: &'t mut Tables,
        id: &str,
    ) -> Result<&'t mut ReceivingShipment, AppError> {
        tx.shipments
            .get_mut(id)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Remessa {}", id)))
    }
}
