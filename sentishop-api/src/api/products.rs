//! Product endpoints
//!
//! POST /products accepts a multipart form (`name`, `price`, file `image`);
//! GET /products lists the catalog, optionally filtered by `?emotion=`.
//! A repeated `emotion` parameter uses its first value.

use axum::{
    extract::{multipart::MultipartRejection, rejection::QueryRejection, Multipart, Query, State},
    http::StatusCode,
    Json,
};
use sentishop_common::{Error, Product, ProductWithEmotion};

use super::{ApiError, Created, Listing};
use crate::{catalog, operations, AppState};

/// GET /products
pub async fn list_products(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Listing<ProductWithEmotion>>, ApiError> {
    let Query(params) = query.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let emotion = params
        .iter()
        .find(|(key, _)| key == "emotion")
        .map(|(_, value)| value.as_str());

    let data = catalog::list_products(&state.store, emotion).await;
    Ok(Json(Listing { data }))
}

/// POST /products
pub async fn create_product(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<Created<Product>>), ApiError> {
    let mut multipart =
        multipart.map_err(|e| Error::InvalidInput(format!("Expected multipart form: {}", e.body_text())))?;

    let mut name = None;
    let mut price = None;
    let mut image = None;

    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let field_name = field.name().map(str::to_string);
        match field_name.as_deref() {
            Some("name") => name = Some(field.text().await.map_err(malformed)?),
            Some("price") => price = Some(field.text().await.map_err(malformed)?),
            Some("image") => image = Some(field.bytes().await.map_err(malformed)?),
            _ => {}
        }
    }

    let name = name.ok_or_else(|| missing("name"))?;
    let price = operations::parse_price(&price.ok_or_else(|| missing("price"))?)?;
    let image = image.ok_or_else(|| missing("image"))?;

    let product = operations::add_product(&state, name, price, &image).await?;

    Ok((
        StatusCode::CREATED,
        Json(Created {
            message: "Product added",
            data: product,
        }),
    ))
}

fn malformed(err: axum::extract::multipart::MultipartError) -> Error {
    Error::InvalidInput(format!("Malformed multipart body: {}", err.body_text()))
}

fn missing(field: &str) -> Error {
    Error::InvalidInput(format!("Missing form field '{}'", field))
}
