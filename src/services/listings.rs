//! Listing management service

use crate::{
    error::{AppError, AppResult},
    models::listing::{CreateListing, Listing, ListingDetails, ListingQuery, UpdateListing},
    repository::Repository,
};

#[derive(Clone)]
pub struct ListingsService {
    repository: Repository,
}

impl ListingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Active listings with optional book/user filters
    pub async fn list(&self, query: &ListingQuery) -> AppResult<Vec<ListingDetails>> {
        let listings = self.repository.listings.list_active(query).await?;
        let mut result = Vec::with_capacity(listings.len());
        for listing in listings {
            result.push(self.details(listing).await?);
        }
        Ok(result)
    }

    pub async fn get(&self, id: i32) -> AppResult<ListingDetails> {
        let listing = self.repository.listings.get_by_id(id).await?;
        self.details(listing).await
    }

    /// Create a listing owned by the actor
    pub async fn create(&self, user_id: i32, listing: CreateListing) -> AppResult<ListingDetails> {
        let book = self.repository.books.get_by_id(listing.book_id).await?;

        let created = self.repository.listings.create(user_id, &listing).await?;
        self.repository
            .feed
            .record_activity(user_id, &format!("listed \"{}\"", book.title))
            .await?;
        self.details(created).await
    }

    /// Update an own listing
    pub async fn update(
        &self,
        id: i32,
        actor: i32,
        listing: UpdateListing,
    ) -> AppResult<ListingDetails> {
        self.require_owner(id, actor).await?;
        let updated = self.repository.listings.update(id, &listing).await?;
        self.details(updated).await
    }

    /// Soft-deactivate an own listing
    pub async fn deactivate(&self, id: i32, actor: i32) -> AppResult<ListingDetails> {
        self.require_owner(id, actor).await?;
        let listing = self.repository.listings.deactivate(id).await?;
        self.details(listing).await
    }

    async fn require_owner(&self, id: i32, actor: i32) -> AppResult<()> {
        let listing = self.repository.listings.get_by_id(id).await?;
        if listing.user_id != actor {
            return Err(AppError::PermissionDenied(
                "Only the listing owner may modify it".to_string(),
            ));
        }
        Ok(())
    }

    async fn details(&self, listing: Listing) -> AppResult<ListingDetails> {
        let user = self.repository.users.get_by_id(listing.user_id).await?;
        let books = self.repository.books.summaries(&[listing.book_id]).await?;
        let book = books
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Listed book missing".to_string()))?;

        Ok(ListingDetails {
            id: listing.id,
            user: (&user).into(),
            book,
            listing_type: listing.listing_type,
            condition: listing.condition,
            city: listing.city,
            price: listing.price,
            description: listing.description,
            is_active: listing.is_active,
            created_at: listing.created_at,
        })
    }
}
