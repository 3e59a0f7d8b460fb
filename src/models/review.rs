//! Review model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::user::UserSummary;

/// Review row from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub rating: i16,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Review with embedded reviewer for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewDetails {
    pub id: i32,
    pub user: UserSummary,
    pub book_id: i32,
    pub rating: i16,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Create review request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReview {
    pub book_id: i32,
    /// Star rating from 1 to 5
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[serde(default)]
    pub content: String,
}
