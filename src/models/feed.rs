//! Read-only discovery feeds: book popularity rankings and recent user
//! activity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::book::BookSummary;
use super::user::UserSummary;

/// Ranking row from database, one per rated book
#[derive(Debug, Clone, FromRow)]
pub struct BookRanking {
    pub book_id: i32,
    pub score: f64,
    pub last_updated: DateTime<Utc>,
}

/// Ranking entry with the embedded book for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookRankingDetails {
    pub book: BookSummary,
    pub score: f64,
    pub last_updated: DateTime<Utc>,
}

/// Activity row from database
#[derive(Debug, Clone, FromRow)]
pub struct Activity {
    pub id: i32,
    pub user_id: i32,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Activity entry with the embedded actor for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityDetails {
    pub id: i32,
    pub user: UserSummary,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

/// Paginated feed query
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct FeedQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
