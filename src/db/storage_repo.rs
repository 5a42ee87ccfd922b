// src/db/storage_repo.rs

use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::store::{Store, Tables},
    models::storage::{StorageRequest, StorageRequestStatus},
};

#[derive(Clone)]
pub struct StorageRepository {
    store: Store,
}

impl StorageRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    pub async fn list_requests(&self, status: Option<StorageRequestStatus>) -> Vec<StorageRequest> {
        let tables = self.store.read().await;
        tables
            .storage_requests
            .values()
            .filter(|r| status.is_none_or(|s| r.status == s))
            .cloned()
            .collect()
    }

    /// Espaço já comprometido (soma das solicitações aprovadas).
    pub fn allocated_space(&self, tables: &Tables) -> Decimal {
        allocated_space(tables.storage_requests.values())
    }

    // --- Escrita ---

    /// Ids no formato das telas do armazém: 4001RRD, 4002RRD, ...
    pub fn next_request_id(&self, tx: &mut Tables) -> String {
        loop {
            let candidate = format!("{}RRD", 4000 + tx.sequences.next_storage_request());
            if !tx.storage_requests.contains_key(&candidate) {
                return candidate;
            }
        }
    }

    pub fn insert_request(&self, tx: &mut Tables, request: StorageRequest) -> Result<StorageRequest, AppError> {
        if tx.storage_requests.contains_key(&request.id) {
            return Err(AppError::AlreadyExists(format!("Solicitação {}", request.id)));
        }
        tx.storage_requests.insert(request.id.clone(), request.clone());
        Ok(request)
    }

    pub fn request_mut<'t>(&self, tx: &'t mut Tables, id: &str) -> Result<&'t mut StorageRequest, AppError> {
        tx.storage_requests
            .get_mut(id)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Solicitação {}", id)))
    }
}

pub fn allocated_space<'a>(requests: impl IntoIterator<Item = &'a StorageRequest>) -> Decimal {
    requests
        .into_iter()
        .filter(|r| r.status == StorageRequestStatus::Approved)
        .map(|r| r.requested_space)
        .sum()
}
