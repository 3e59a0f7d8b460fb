//! Conversations and messages repository
//!
//! The participant pair is stored normalized as (user_low, user_high) with a
//! uniqueness constraint, so get_or_create is a single atomic upsert and two
//! racing callers for the same pair always land on the same row.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::conversation::{Conversation, MessageAttachment, MessageRow},
};

#[derive(Clone)]
pub struct ConversationsRepository {
    pool: Pool<Postgres>,
}

impl ConversationsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get conversation by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Conversation> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Conversation with id {} not found", id)))
    }

    /// Return the unique conversation for an unordered user pair, creating it
    /// if none exists. The no-op DO UPDATE makes the insert return the
    /// existing row, so the loser of a concurrent race gets the winner's
    /// conversation instead of an error.
    pub async fn get_or_create(&self, user_x: i32, user_y: i32) -> AppResult<Conversation> {
        let (user_low, user_high) = Conversation::pair_key(user_x, user_y);

        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            INSERT INTO conversations (user_low, user_high)
            VALUES ($1, $2)
            ON CONFLICT (user_low, user_high)
                DO UPDATE SET user_low = EXCLUDED.user_low
            RETURNING *
            "#,
        )
        .bind(user_low)
        .bind(user_high)
        .fetch_one(&self.pool)
        .await?;

        Ok(conversation)
    }

    /// Conversations a user participates in, most recently active first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<Conversation>> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE user_low = $1 OR user_high = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(conversations)
    }

    /// Append a message and bump the conversation's last-activity timestamp
    /// in the same transaction.
    pub async fn append_message(
        &self,
        conversation_id: i32,
        sender_id: i32,
        content: &str,
        attachment: Option<MessageAttachment>,
    ) -> AppResult<MessageRow> {
        let (book_id, listing_id, exchange_offer_id) = MessageAttachment::into_columns(attachment);

        let mut tx = self.pool.begin().await?;

        let message = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, content, book_id, listing_id, exchange_offer_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(conversation_id)
        .bind(sender_id)
        .bind(content)
        .bind(book_id)
        .bind(listing_id)
        .bind(exchange_offer_id)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("UPDATE conversations SET updated_at = $1 WHERE id = $2")
            .bind(message.created_at)
            .bind(conversation_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(message)
    }

    /// Get message by ID
    pub async fn get_message(&self, id: i32) -> AppResult<MessageRow> {
        sqlx::query_as::<_, MessageRow>("SELECT * FROM messages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Message with id {} not found", id)))
    }

    /// Set the read flag; already-read messages stay read
    pub async fn mark_message_read(&self, id: i32) -> AppResult<MessageRow> {
        let message = sqlx::query_as::<_, MessageRow>(
            "UPDATE messages SET is_read = TRUE WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Message with id {} not found", id)))?;
        Ok(message)
    }

    /// The most recent message of a conversation, if any
    pub async fn last_message(&self, conversation_id: i32) -> AppResult<Option<MessageRow>> {
        let message = sqlx::query_as::<_, MessageRow>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(conversation_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(message)
    }

    /// Messages of conversations the user participates in, chronological,
    /// optionally filtered to one conversation. Limit/offset pagination makes
    /// the sequence restartable from any position.
    pub async fn messages_for_user(
        &self,
        user_id: i32,
        conversation_id: Option<i32>,
        limit: i64,
        offset: i64,
    ) -> AppResult<Vec<MessageRow>> {
        let messages = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT m.* FROM messages m
            JOIN conversations c ON c.id = m.conversation_id
            WHERE (c.user_low = $1 OR c.user_high = $1)
              AND ($2::int IS NULL OR m.conversation_id = $2)
            ORDER BY m.created_at, m.id
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(user_id)
        .bind(conversation_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        Ok(messages)
    }
}
