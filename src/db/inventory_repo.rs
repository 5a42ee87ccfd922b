// src/db/inventory_repo.rs

use crate::{
    common::error::AppError,
    db::store::{Store, Tables},
    models::inventory::{Product, StockStatus},
};

#[derive(Clone)]
pub struct InventoryRepository {
    store: Store,
}

impl InventoryRepository {
    pub fn new(store: Store) -> Self {
        Self { store }
    }

    // ---
    // Funções de "Leitura" (Getters)
    // ---
    // Leituras simples usam o guard de leitura do próprio store.

    /// Lista produtos ordenados por SKU, com busca (sku/nome/categoria) e filtro de status opcionais.
    pub async fn list_products(
        &self,
        search: Option<&str>,
        status: Option<StockStatus>,
    ) -> Vec<Product> {
        let tables = self.store.read().await;
        let needle = search.map(str::to_lowercase);

        tables
            .products
            .values()
            .filter(|p| status.is_none_or(|s| p.status() == s))
            .filter(|p| {
                needle.as_deref().is_none_or(|n| {
                    p.sku.to_lowercase().contains(n)
                        || p.name.to_lowercase().contains(n)
                        || p.category.to_lowercase().contains(n)
                })
            })
            .cloned()
            .collect()
    }

    pub async fn find_product(&self, sku: &str) -> Option<Product> {
        self.store.read().await.products.get(sku).cloned()
    }

    // ---
    // Funções de "Escrita" (Transacionais)
    // ---
    // Recebem as tabelas já travadas pelo serviço (`store.begin()`).

    pub fn insert_product(&self, tx: &mut Tables, product: Product) -> Result<Product, AppError> {
        if tx.products.contains_key(&product.sku) {
            return Err(AppError::AlreadyExists(format!("SKU {}", product.sku)));
        }
        tx.products.insert(product.sku.clone(), product.clone());
        Ok(product)
    }

    pub fn product_mut<'t>(&self, tx: &'t mut Tables, sku: &str) -> Result<&'t mut Product, AppError> {
        tx.products
            .get_mut(sku)
            .ok_or_else(|| AppError::ResourceNotFound(format!("Produto {}", sku)))
    }
}
