//! Review management service
//!
//! Review creation and deletion explicitly invoke the rating aggregator for
//! the affected book, keeping the recompute dependency visible instead of
//! hiding it behind a save hook.

use crate::{
    error::{AppError, AppResult},
    models::review::{CreateReview, Review, ReviewDetails},
    repository::Repository,
};

use super::ratings::RatingAggregator;

#[derive(Clone)]
pub struct ReviewsService {
    repository: Repository,
    ratings: RatingAggregator,
}

impl ReviewsService {
    pub fn new(repository: Repository) -> Self {
        let ratings = RatingAggregator::new(repository.clone());
        Self { repository, ratings }
    }

    /// Create a review and recompute the book's cached average rating
    pub async fn create(&self, user_id: i32, review: CreateReview) -> AppResult<ReviewDetails> {
        let book = self.repository.books.get_by_id(review.book_id).await?;

        if self
            .repository
            .reviews
            .exists_for(user_id, review.book_id)
            .await?
        {
            return Err(AppError::Conflict(
                "User has already reviewed this book".to_string(),
            ));
        }

        let created = self.repository.reviews.create(user_id, &review).await?;
        self.ratings.recompute(created.book_id).await?;
        self.repository
            .feed
            .record_activity(user_id, &format!("reviewed \"{}\"", book.title))
            .await?;

        self.details(created).await
    }

    /// Delete own review and recompute the book's cached average rating
    pub async fn delete(&self, id: i32, actor: i32) -> AppResult<()> {
        let review = self.repository.reviews.get_by_id(id).await?;

        if review.user_id != actor {
            return Err(AppError::PermissionDenied(
                "Only the review author may delete it".to_string(),
            ));
        }

        self.repository.reviews.delete(id).await?;
        self.ratings.recompute(review.book_id).await?;
        Ok(())
    }

    /// Reviews of one book with embedded reviewers, newest first
    pub async fn for_book(&self, book_id: i32) -> AppResult<Vec<ReviewDetails>> {
        // Verify book exists
        self.repository.books.get_by_id(book_id).await?;

        let reviews = self.repository.reviews.for_book(book_id).await?;
        let mut result = Vec::with_capacity(reviews.len());
        for review in reviews {
            result.push(self.details(review).await?);
        }
        Ok(result)
    }

    async fn details(&self, review: Review) -> AppResult<ReviewDetails> {
        let user = self.repository.users.get_by_id(review.user_id).await?;
        Ok(ReviewDetails {
            id: review.id,
            user: (&user).into(),
            book_id: review.book_id,
            rating: review.rating,
            content: review.content,
            created_at: review.created_at,
        })
    }
}
