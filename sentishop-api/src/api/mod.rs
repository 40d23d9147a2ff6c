//! HTTP API handlers for sentishop-api

pub mod buildinfo;
pub mod error;
pub mod health;
pub mod products;
pub mod reviews;

pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use health::health_routes;
pub use products::{create_product, list_products};
pub use reviews::create_review;

use serde::Serialize;

/// Body of a successful create request: `{message, data}`
#[derive(Debug, Serialize)]
pub struct Created<T> {
    pub message: &'static str,
    pub data: T,
}

/// Body of a listing request: `{data}`
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    pub data: Vec<T>,
}
