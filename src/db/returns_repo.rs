// src/db/returns_repo.rs

use crate::{
    common::error::AppError,
    db::store::{Store, Tables},
    models::returns::{ReturnAuthorization, ReturnStatus},
};

#[derive(Clone)]
pub struct ReturnsRepository {
    store: Store,
}

impl ReturnsRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_returns(&self, status: Option<ReturnStatus>) -> Vec<ReturnAuthorization> {
        let tables = self.store.read().await;
        let mut returns: Vec<ReturnAuthorization> = tables
            .returns
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect();

        returns.sort_by(|a, b| b.return_date.cmp(&a.return_date));
        returns
    }

    pub async fn find_return(&self, rma_number: &str) -> Option<ReturnAuthorization> {
        self.store.read().await.returns.get(rma_number).cloned()
    }

    /// Quantidade já devolvida de um item do pedido (RMAs rejeitadas não contam).
    pub fn returned_quantity(&self, tables: &Tables, order_number: &str, sku: &str) -> u32 {
        tables
            .returns
            .values()
            .filter(|r| r.order_number == order_number && r.sku == sku)
            .filter(|r| r.status != ReturnStatus::Rejected)
            .map(|r| r.quantity)
            .sum()
    }

    /// RMAs não rejeitadas ligadas ao pedido.
    pub fn active_returns_for_order(&self, tables: &Tables, order_number: &str) -> usize {
        tables
            .returns
            .values()
            .filter(|r| r.order_number == order_number && r.status != ReturnStatus::Rejected)
            .count()
    }

    // --- Escrita ---

    pub fn next_rma_number(&self, tx: &mut Tables, year: i32) -> String {
        loop {
            let candidate = format!("RMA-{}-{:03}", year, tx.sequences.next_rma());
            if !tx.returns.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn insert_return(
        &self,
        tx: &mut Tables,
        rma: ReturnAuthorization,
    ) -> Result<ReturnAuthorization, AppError> {
        if tx.returns.contains_key(&rma.rma_number) {
            return Err(AppError::AlreadyExists(format!("RMA {}", rma.rma_number)));
        }
        tx.returns.insert(rma.rma_number.clone(), rma.clone());
        Ok(rma)
    }

    pub fn return_mut<'t>(
        &self,
        tx: &'t mut Tables,
        rma_number: &str,
    ) -> Result<&'t mut ReturnAuthorization, AppError> {
        tx.returns
            .get_mut(rma_number)
            .ok_or_else(|| AppError::ResourceNotFound(format!("RMA {}", rma_number)))
    }

    pub fn delete_return(&self, tx: &mut Tables, rma_number: &str) -> Result<ReturnAuthorization, AppError> {
        tx.returns
            .remove(rma_number)
            .ok_or_else(|| AppError::ResourceNotFound(format!("RMA {}", rma_number)))
    }
}
