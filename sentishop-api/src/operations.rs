//! Product and review creation
//!
//! A record is appended only after its adapter succeeded, so a failed
//! classification or sentiment call never leaves a partial record behind.

use sentishop_common::{time, uuid_utils, Error, Product, Result, Review};
use tracing::{debug, info, warn};

use crate::services::preprocess;
use crate::AppState;

/// Coerce a form `price` value into a finite, non-negative number
pub fn parse_price(raw: &str) -> Result<f64> {
    let price: f64 = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("price must be a number, got {:?}", raw)))?;

    if !price.is_finite() || price < 0.0 {
        return Err(Error::InvalidInput(format!("price must be a non-negative number, got {}", raw)));
    }
    Ok(price)
}

/// Store the image, classify it and append a new product
///
/// On classification failure the stored file is removed again.
pub async fn add_product(
    state: &AppState,
    name: String,
    price: f64,
    image_bytes: &[u8],
) -> Result<Product> {
    let stored = state.uploads.save(image_bytes).await?;

    let category = match classify_stored(state, &stored).await {
        Ok(category) => category,
        Err(e) => {
            if let Err(cleanup) = state.uploads.remove(&stored).await {
                warn!(path = %stored.path.display(), error = %cleanup, "Could not remove orphaned upload");
            }
            return Err(e);
        }
    };

    let product = Product {
        id: uuid_utils::generate_string(),
        name,
        category,
        price,
        image_url: stored.url(),
        created_at: time::now(),
    };
    state.store.append_product(product.clone()).await;

    info!(id = %product.id, category = %product.category, "Product added");
    Ok(product)
}

async fn classify_stored(state: &AppState, stored: &crate::uploads::StoredImage) -> Result<String> {
    let bytes = state.uploads.read(stored).await?;
    let tensor = tokio::task::spawn_blocking(move || preprocess(&bytes))
        .await
        .map_err(|e| Error::Internal(format!("Image preprocessing task failed: {}", e)))??;
    state.classifier.classify(&tensor).await
}

/// Score the comment and append a new review
///
/// `product_id` is not checked against the catalog; reviews for unknown
/// products are stored as is.
pub async fn add_review(state: &AppState, product_id: String, comment: String) -> Result<Review> {
    if comment.trim().is_empty() {
        return Err(Error::InvalidInput("comment must not be empty".to_string()));
    }

    let sentiment = state.sentiment.analyze(&comment).await?;

    if !state.store.contains_product(&product_id).await {
        debug!(%product_id, "Review references an unknown product");
    }

    let review = Review {
        id: uuid_utils::generate_string(),
        product_id,
        comment,
        emotion: sentiment.label,
        score: sentiment.score,
        created_at: time::now(),
    };
    state.store.append_review(review.clone()).await;

    info!(id = %review.id, product_id = %review.product_id, emotion = %review.emotion, "Review added");
    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_accepts_numbers() {
        assert_eq!(parse_price("100000").unwrap(), 100000.0);
        assert_eq!(parse_price(" 12.5 ").unwrap(), 12.5);
        assert_eq!(parse_price("0").unwrap(), 0.0);
    }

    #[test]
    fn test_parse_price_rejects_bad_values() {
        for raw in ["", "abc", "-1", "NaN", "inf"] {
            let err = parse_price(raw).unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)), "{:?} should be rejected", raw);
        }
    }
}
