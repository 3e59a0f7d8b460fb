//! Personal library and wishlist models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookSummary;

/// A book in a user's library or wishlist
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ShelfEntry {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub added_at: DateTime<Utc>,
}

/// Shelf entry with embedded book for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ShelfEntryDetails {
    pub id: i32,
    pub book: BookSummary,
    pub added_at: DateTime<Utc>,
}

/// Add a book to a library or wishlist
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddShelfEntry {
    pub book_id: i32,
}
