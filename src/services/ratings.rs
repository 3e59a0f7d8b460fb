//! Rating aggregation
//!
//! Recomputes a book's cached average rating and its ranking score after a
//! review is created or deleted. The recompute writes only those derived
//! fields; concurrent recomputes for the same book are last-write-wins,
//! which is acceptable since both writers derive from the same review set
//! modulo the race.

use crate::{error::AppResult, repository::Repository};

/// Mean of the given ratings rounded to 2 decimal places, 0.0 when empty
pub fn average_rating(ratings: &[i16]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    let mean = sum as f64 / ratings.len() as f64;
    (mean * 100.0).round() / 100.0
}

/// Ranking score of a book: the sum of its ratings, so a book with many
/// good reviews outranks one with a single perfect review
pub fn ranking_score(ratings: &[i16]) -> f64 {
    ratings.iter().map(|r| *r as i64).sum::<i64>() as f64
}

#[derive(Clone)]
pub struct RatingAggregator {
    repository: Repository,
}

impl RatingAggregator {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Recompute and persist the cached average rating and ranking score of
    /// a book
    pub async fn recompute(&self, book_id: i32) -> AppResult<f64> {
        let ratings = self.repository.reviews.ratings_for_book(book_id).await?;
        let average = average_rating(&ratings);
        let score = ranking_score(&ratings);

        self.repository
            .books
            .set_average_rating(book_id, average)
            .await?;
        self.repository.feed.upsert_ranking(book_id, score).await?;

        tracing::debug!(book_id, average, score, reviews = ratings.len(), "rating recomputed");
        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_reviews_means_zero() {
        assert_eq!(average_rating(&[]), 0.0);
    }

    #[test]
    fn test_single_review() {
        assert_eq!(average_rating(&[4]), 4.0);
    }

    #[test]
    fn test_mean_is_rounded_to_two_decimals() {
        // 1 + 2 + 5 = 8 / 3 = 2.666... -> 2.67
        assert_eq!(average_rating(&[1, 2, 5]), 2.67);
        // 1 + 1 + 2 = 4 / 3 = 1.333... -> 1.33
        assert_eq!(average_rating(&[1, 1, 2]), 1.33);
    }

    #[test]
    fn test_exact_means_are_unchanged() {
        assert_eq!(average_rating(&[2, 4]), 3.0);
        assert_eq!(average_rating(&[5, 4]), 4.5);
    }

    #[test]
    fn test_ranking_score_is_rating_sum() {
        assert_eq!(ranking_score(&[]), 0.0);
        assert_eq!(ranking_score(&[4]), 4.0);
        assert_eq!(ranking_score(&[3, 3, 3]), 9.0);
    }

    #[test]
    fn test_many_good_reviews_outrank_one_perfect_review() {
        assert!(ranking_score(&[4, 4, 4]) > ranking_score(&[5]));
    }
}
