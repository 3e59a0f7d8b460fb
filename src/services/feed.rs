//! Discovery feed service
//!
//! Read-only views over the ranking and activity tables. Rankings are
//! maintained by the rating aggregator; activity entries are recorded by the
//! mutating services (reviews, listings, exchanges).

use std::collections::HashMap;

use crate::{
    error::AppResult,
    models::feed::{ActivityDetails, BookRankingDetails},
    repository::Repository,
};

#[derive(Clone)]
pub struct FeedService {
    repository: Repository,
}

impl FeedService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Book rankings with embedded book summaries, highest score first
    pub async fn rankings(&self, limit: i64, offset: i64) -> AppResult<Vec<BookRankingDetails>> {
        let rankings = self.repository.feed.list_rankings(limit, offset).await?;

        let book_ids: Vec<i32> = rankings.iter().map(|r| r.book_id).collect();
        let books: HashMap<i32, _> = self
            .repository
            .books
            .summaries(&book_ids)
            .await?
            .into_iter()
            .map(|b| (b.id, b))
            .collect();

        Ok(rankings
            .into_iter()
            .filter_map(|ranking| {
                books.get(&ranking.book_id).cloned().map(|book| BookRankingDetails {
                    book,
                    score: ranking.score,
                    last_updated: ranking.last_updated,
                })
            })
            .collect())
    }

    /// Recent activity with embedded actors, newest first
    pub async fn activities(&self, limit: i64, offset: i64) -> AppResult<Vec<ActivityDetails>> {
        let activities = self.repository.feed.list_activities(limit, offset).await?;

        let user_ids: Vec<i32> = activities.iter().map(|a| a.user_id).collect();
        let users: HashMap<i32, _> = self
            .repository
            .users
            .summaries(&user_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        Ok(activities
            .into_iter()
            .filter_map(|activity| {
                users.get(&activity.user_id).cloned().map(|user| ActivityDetails {
                    id: activity.id,
                    user,
                    action: activity.action,
                    created_at: activity.created_at,
                })
            })
            .collect())
    }
}
