//! In-memory record store
//!
//! Holds products and reviews as append-only sequences. Insertion order is
//! the only ordering. Each collection sits behind its own lock so concurrent
//! appends are serialized; readers get cloned snapshots.

use sentishop_common::{Error, Product, Result, Review};
use serde::Deserialize;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::info;

/// Fixture shape accepted by [`RecordStore::seed`]
#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    products: RwLock<Vec<Product>>,
    reviews: RwLock<Vec<Review>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append_product(&self, product: Product) {
        self.products.write().await.push(product);
    }

    pub async fn append_review(&self, review: Review) {
        self.reviews.write().await.push(review);
    }

    pub async fn all_products(&self) -> Vec<Product> {
        self.products.read().await.clone()
    }

    /// Reviews referencing `product_id`, in insertion order
    pub async fn reviews_for(&self, product_id: &str) -> Vec<Review> {
        self.reviews
            .read()
            .await
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect()
    }

    pub async fn contains_product(&self, product_id: &str) -> bool {
        self.products.read().await.iter().any(|p| p.id == product_id)
    }

    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn review_count(&self) -> usize {
        self.reviews.read().await.len()
    }

    /// Preload records from a JSON fixture file
    ///
    /// Returns the number of products and reviews appended.
    pub async fn seed(&self, path: &Path) -> Result<(usize, usize)> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| Error::Config(format!("Cannot read seed file {}: {}", path.display(), e)))?;
        let data: SeedData = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid seed file {}: {}", path.display(), e)))?;

        let counts = (data.products.len(), data.reviews.len());
        self.products.write().await.extend(data.products);
        self.reviews.write().await.extend(data.reviews);

        info!(
            products = counts.0,
            reviews = counts.1,
            "Seeded record store from {}",
            path.display()
        );
        Ok(counts)
    }
}
