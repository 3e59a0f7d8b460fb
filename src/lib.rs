//! Bookmarket - Book Cataloguing and Social Marketplace Server
//!
//! A REST JSON API for a shared book catalog with user reviews, personal
//! libraries and wishlists, peer-to-peer listings, book exchange negotiation,
//! and direct messaging between users.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
