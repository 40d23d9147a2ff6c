//! Domain records shared between the store, the catalog and the HTTP layer

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A catalog entry created from an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    /// Label assigned by the image classifier at creation; never edited
    pub category: String,
    pub price: f64,
    /// `/uploads/<filename>` of the stored image
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

/// A customer review scored by the sentiment analyzer
///
/// Field names on the wire follow the camelCase shape clients send
/// (`productId`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    /// Not checked against the product collection
    pub product_id: String,
    pub comment: String,
    pub emotion: String,
    /// Confidence in [0, 1] for `emotion`
    pub score: f64,
    pub created_at: DateTime<Utc>,
}

/// Product listing entry annotated with its dominant review emotion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductWithEmotion {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
    pub emotion: String,
}

impl ProductWithEmotion {
    pub fn new(product: &Product, emotion: impl Into<String>) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            category: product.category.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            created_at: product.created_at,
            emotion: emotion.into(),
        }
    }
}
