//! sentishop-api library - product catalog with review sentiment
//!
//! Products are classified from their uploaded image; reviews are scored
//! for sentiment; the catalog lists each product with the dominant
//! emotion of its reviews.

use axum::{extract::DefaultBodyLimit, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub mod api;
pub mod catalog;
pub mod operations;
pub mod services;
pub mod store;
pub mod uploads;

use services::{ImageClassifier, SentimentAnalyzer};
use store::RecordStore;
use uploads::{UploadStorage, UPLOADS_ROUTE};

/// Largest accepted request body (multipart image uploads)
pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub uploads: UploadStorage,
    pub classifier: Arc<dyn ImageClassifier>,
    pub sentiment: Arc<dyn SentimentAnalyzer>,
}

impl AppState {
    pub fn new(
        store: Arc<RecordStore>,
        uploads: UploadStorage,
        classifier: Arc<dyn ImageClassifier>,
        sentiment: Arc<dyn SentimentAnalyzer>,
    ) -> Self {
        Self {
            store,
            uploads,
            classifier,
            sentiment,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let upload_files = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/products", get(api::list_products).post(api::create_product))
        .route("/reviews", post(api::create_review))
        .route("/build_info", get(api::get_build_info))
        .merge(api::health_routes())
        .nest_service(UPLOADS_ROUTE, upload_files)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
