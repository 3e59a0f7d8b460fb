//! Feed repository: book rankings and the user activity log

use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::feed::{Activity, BookRanking},
};

#[derive(Clone)]
pub struct FeedRepository {
    pool: Pool<Postgres>,
}

impl FeedRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert or update a book's ranking score
    pub async fn upsert_ranking(&self, book_id: i32, score: f64) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO book_rankings (book_id, score)
            VALUES ($1, $2)
            ON CONFLICT (book_id)
            DO UPDATE SET score = EXCLUDED.score, last_updated = NOW()
            "#,
        )
        .bind(book_id)
        .bind(score)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Rankings ordered by score, highest first
    pub async fn list_rankings(&self, limit: i64, offset: i64) -> AppResult<Vec<BookRanking>> {
        let rankings = sqlx::query_as::<_, BookRanking>(
            r#"
            SELECT book_id, score, last_updated
            FROM book_rankings
            ORDER BY score DESC, book_id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(rankings)
    }

    /// Append an entry to a user's activity log
    pub async fn record_activity(&self, user_id: i32, action: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO activities (user_id, action) VALUES ($1, $2)")
            .bind(user_id)
            .bind(action)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Activities, newest first
    pub async fn list_activities(&self, limit: i64, offset: i64) -> AppResult<Vec<Activity>> {
        let activities = sqlx::query_as::<_, Activity>(
            "SELECT * FROM activities ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(activities)
    }
}
