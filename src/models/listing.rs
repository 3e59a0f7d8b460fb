//! Listing model and related types

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookSummary;
use super::user::UserSummary;

/// How a copy is offered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "listing_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ListingType {
    Sale,
    Exchange,
}

/// Condition of the offered copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "book_condition", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    Used,
}

/// Listing row from database
#[derive(Debug, Clone, FromRow)]
pub struct Listing {
    pub id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub listing_type: ListingType,
    pub condition: Condition,
    pub city: Option<String>,
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Listing with embedded owner and book for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListingDetails {
    pub id: i32,
    pub user: UserSummary,
    pub book: BookSummary,
    pub listing_type: ListingType,
    pub condition: Condition,
    pub city: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Create listing request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateListing {
    pub book_id: i32,
    pub listing_type: ListingType,
    pub condition: Condition,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub description: Option<String>,
}

/// Update listing request (owner only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateListing {
    pub listing_type: Option<ListingType>,
    pub condition: Option<Condition>,
    pub city: Option<String>,
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    pub description: Option<String>,
}

/// Paginated listing query
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListingQuery {
    /// Restrict to listings of one book
    pub book_id: Option<i32>,
    /// Restrict to listings of one user
    pub user_id: Option<i32>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
