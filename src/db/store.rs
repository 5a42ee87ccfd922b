// src/db/store.rs

use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::models::{
    inventory::Product,
    notifications::Notification,
    orders::Order,
    receiving::ReceivingShipment,
    returns::ReturnAuthorization,
    settings::WarehouseSettings,
    storage::StorageRequest,
};

// Contadores usados para gerar os identificadores legíveis (ORD-, RMA-, SH-, ...RRD)
#[derive(Debug, Default, Clone)]
pub struct Sequences {
    pub order: u64,
    pub rma: u64,
    pub storage_request: u64,
    pub shipment: u64,
    pub notification: u64,
    pub tracking: u64,
}

impl Sequences {
    pub fn next_order(&mut self) -> u64 {
        self.order += 1;
        self.order
    }

    pub fn next_rma(&mut self) -> u64 {
        self.rma += 1;
        self.rma
    }

    pub fn next_storage_request(&mut self) -> u64 {
        self.storage_request += 1;
        self.storage_request
    }

    pub fn next_shipment(&mut self) -> u64 {
        self.shipment += 1;
        self.shipment
    }

    pub fn next_notification(&mut self) -> u64 {
        self.notification += 1;
        self.notification
    }

    pub fn next_tracking(&mut self) -> u64 {
        self.tracking += 1;
        self.tracking
    }
}

/// Todas as "tabelas" do armazém. Chaves naturais: SKU, número do pedido, número do RMA...
#[derive(Debug, Clone)]
pub struct Tables {
    pub products: BTreeMap<String, Product>,
    pub orders: BTreeMap<String, Order>,
    pub returns: BTreeMap<String, ReturnAuthorization>,
    pub storage_requests: BTreeMap<String, StorageRequest>,
    pub shipments: BTreeMap<String, ReceivingShipment>,
    pub notifications: BTreeMap<u64, Notification>,
    pub settings: WarehouseSettings,
    pub sequences: Sequences,
}

impl Tables {
    pub fn new(settings: WarehouseSettings) -> Self {
        Self {
            products: BTreeMap::new(),
            orders: BTreeMap::new(),
            returns: BTreeMap::new(),
            storage_requests: BTreeMap::new(),
            shipments: BTreeMap::new(),
            notifications: BTreeMap::new(),
            settings,
            sequences: Sequences::default(),
        }
    }
}

// Handle compartilhado (o equivalente à pool): clonar é barato.
#[derive(Clone)]
pub struct Store {
    inner: Arc<RwLock<Tables>>,
}

impl Store {
    pub fn new(settings: WarehouseSettings) -> Self {
        Self::from_tables(Tables::new(settings))
    }

    pub fn from_tables(tables: Tables) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tables)),
        }
    }

    /// Leitura consistente de todas as tabelas.
    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.inner.read().await
    }

    /// Abre uma "transação": o guard de escrita é exclusivo até ser liberado (drop = commit).
    /// Validações devem ocorrer antes de qualquer mutação, pois não há rollback.
    pub async fn begin(&self) -> RwLockWriteGuard<'_, Tables> {
        self.inner.write().await
    }
}
