//! # SentiShop Common Library
//!
//! Shared code for the SentiShop services:
//! - Domain records (products, reviews)
//! - Configuration loading
//! - Error types
//! - Time and id helpers

pub mod config;
pub mod error;
pub mod models;
pub mod time;
pub mod uuid_utils;

pub use error::{Error, Result};
pub use models::{Product, ProductWithEmotion, Review};
