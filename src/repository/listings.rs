//! Listings repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::listing::{CreateListing, Listing, ListingQuery, UpdateListing},
};

#[derive(Clone)]
pub struct ListingsRepository {
    pool: Pool<Postgres>,
}

impl ListingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get listing by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Listing> {
        sqlx::query_as::<_, Listing>("SELECT * FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Listing with id {} not found", id)))
    }

    /// Create a listing owned by the given user
    pub async fn create(&self, user_id: i32, listing: &CreateListing) -> AppResult<Listing> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            INSERT INTO listings (user_id, book_id, listing_type, condition, city, price, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(listing.book_id)
        .bind(listing.listing_type)
        .bind(listing.condition)
        .bind(&listing.city)
        .bind(listing.price)
        .bind(&listing.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(listing)
    }

    /// Update listing fields
    pub async fn update(&self, id: i32, listing: &UpdateListing) -> AppResult<Listing> {
        let listing = sqlx::query_as::<_, Listing>(
            r#"
            UPDATE listings SET
                listing_type = COALESCE($1, listing_type),
                condition = COALESCE($2, condition),
                city = COALESCE($3, city),
                price = COALESCE($4, price),
                description = COALESCE($5, description)
            WHERE id = $6
            RETURNING *
            "#,
        )
        .bind(listing.listing_type)
        .bind(listing.condition)
        .bind(&listing.city)
        .bind(listing.price)
        .bind(&listing.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing with id {} not found", id)))?;

        Ok(listing)
    }

    /// Soft-deactivate a listing; rows are never hard-deleted in normal flows
    pub async fn deactivate(&self, id: i32) -> AppResult<Listing> {
        let listing = sqlx::query_as::<_, Listing>(
            "UPDATE listings SET is_active = FALSE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Listing with id {} not found", id)))?;

        Ok(listing)
    }

    /// List active listings with optional book/user filters, newest first
    pub async fn list_active(&self, query: &ListingQuery) -> AppResult<Vec<Listing>> {
        let limit = query.limit.unwrap_or(50).clamp(1, 200);
        let offset = query.offset.unwrap_or(0).max(0);

        let listings = sqlx::query_as::<_, Listing>(
            r#"
            SELECT * FROM listings
            WHERE is_active
              AND ($1::int IS NULL OR book_id = $1)
              AND ($2::int IS NULL OR user_id = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(query.book_id)
        .bind(query.user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(listings)
    }

    /// Whether the user has an active listing of the given book
    pub async fn user_has_active_listing(&self, user_id: i32, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM listings WHERE user_id = $1 AND book_id = $2 AND is_active)",
        )
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
