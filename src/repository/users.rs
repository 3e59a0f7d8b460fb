//! Users repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::user::{Follow, UpdateProfile, User, UserSummary},
};

#[derive(Clone)]
pub struct UsersRepository {
    pool: Pool<Postgres>,
}

impl UsersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get user by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Get user by username
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Check whether a username is taken
    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    /// Create a new user
    pub async fn create(
        &self,
        username: &str,
        email: Option<&str>,
        password_hash: &str,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update profile fields of a user
    pub async fn update_profile(
        &self,
        id: i32,
        profile: &UpdateProfile,
        password_hash: Option<String>,
    ) -> AppResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                email = COALESCE($1, email),
                avatar_url = COALESCE($2, avatar_url),
                bio = COALESCE($3, bio),
                password_hash = COALESCE($4, password_hash)
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(&profile.email)
        .bind(&profile.avatar_url)
        .bind(&profile.bio)
        .bind(password_hash)
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// List users, paginated
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, avatar_url FROM users ORDER BY username LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Compact summaries for a set of user ids
    pub async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<UserSummary>> {
        let users = sqlx::query_as::<_, UserSummary>(
            "SELECT id, username, avatar_url FROM users WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    /// Create a follow edge
    pub async fn follow(&self, follower_id: i32, following_id: i32) -> AppResult<Follow> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND following_id = $2)",
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        if exists {
            return Err(AppError::Conflict("Already following this user".to_string()));
        }

        let follow = sqlx::query_as::<_, Follow>(
            r#"
            INSERT INTO follows (follower_id, following_id)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(follower_id)
        .bind(following_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(follow)
    }

    /// Remove a follow edge owned by the follower
    pub async fn unfollow(&self, id: i32, follower_id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM follows WHERE id = $1 AND follower_id = $2")
            .bind(id)
            .bind(follower_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Follow with id {} not found", id)));
        }
        Ok(())
    }

    /// Follows created by a user
    pub async fn follows_of(&self, follower_id: i32) -> AppResult<Vec<Follow>> {
        let follows = sqlx::query_as::<_, Follow>(
            "SELECT * FROM follows WHERE follower_id = $1 ORDER BY created_at DESC",
        )
        .bind(follower_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(follows)
    }
}
