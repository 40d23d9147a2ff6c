//! Review endpoint
//!
//! `productId` may be sent as a string or a number; numbers are stored in
//! their JSON text form.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use sentishop_common::{Error, Review};
use serde::Deserialize;

use super::{ApiError, Created};
use crate::{operations, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub product_id: ProductRef,
    pub comment: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ProductRef {
    Text(String),
    Number(serde_json::Number),
}

impl From<ProductRef> for String {
    fn from(product: ProductRef) -> Self {
        match product {
            ProductRef::Text(id) => id,
            ProductRef::Number(n) => n.to_string(),
        }
    }
}

/// POST /reviews
pub async fn create_review(
    State(state): State<AppState>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Created<Review>>), ApiError> {
    let Json(request) = body.map_err(|e| Error::InvalidInput(e.body_text()))?;

    let review = operations::add_review(&state, request.product_id.into(), request.comment).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "Review added",
            data: review,
        }),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> serde_json::Result<CreateReviewRequest> {
        serde_json::from_str(body)
    }

    #[test]
    fn test_product_id_accepts_string_or_number() {
        let request = parse(r#"{"productId": "abc", "comment": "ok"}"#).unwrap();
        assert_eq!(String::from(request.product_id), "abc");

        let request = parse(r#"{"productId": 42, "comment": "ok"}"#).unwrap();
        assert_eq!(String::from(request.product_id), "42");
    }

    #[test]
    fn test_product_id_rejects_other_types() {
        assert!(parse(r#"{"productId": null, "comment": "ok"}"#).is_err());
        assert!(parse(r#"{"productId": ["a"], "comment": "ok"}"#).is_err());
        assert!(parse(r#"{"comment": "ok"}"#).is_err());
    }
}
