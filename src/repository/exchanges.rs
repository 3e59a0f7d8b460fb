//! Exchange offers repository
//!
//! Negotiation transitions are applied under `SELECT ... FOR UPDATE` on the
//! offer row, so preconditions are re-validated while holding the row lock
//! and two contradictory transitions (say a confirm racing a reject) can
//! never both commit.

use sqlx::{Pool, Postgres, Transaction};

use crate::{
    error::{AppError, AppResult},
    models::exchange::ExchangeOffer,
};

/// Selects an offer with its candidate set aggregated into one array column
const SELECT_OFFER: &str = r#"
    SELECT o.*,
           ARRAY(
               SELECT b.book_id FROM exchange_offer_books b
               WHERE b.offer_id = o.id
               ORDER BY b.book_id
           ) AS books_b
    FROM exchange_offers o
"#;

#[derive(Clone)]
pub struct ExchangesRepository {
    pool: Pool<Postgres>,
}

impl ExchangesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get offer by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<ExchangeOffer> {
        sqlx::query_as::<_, ExchangeOffer>(&format!("{} WHERE o.id = $1", SELECT_OFFER))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Exchange offer with id {} not found", id)))
    }

    /// Offers a user participates in, newest first
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<ExchangeOffer>> {
        let offers = sqlx::query_as::<_, ExchangeOffer>(&format!(
            "{} WHERE o.user_a = $1 OR o.user_b = $1 ORDER BY o.created_at DESC",
            SELECT_OFFER
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(offers)
    }

    /// Create an offer with its candidate set in one transaction
    pub async fn create(
        &self,
        user_a: i32,
        user_b: i32,
        book_a: i32,
        books_b: &[i32],
    ) -> AppResult<ExchangeOffer> {
        let mut tx = self.pool.begin().await?;

        let offer_id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO exchange_offers (user_a, user_b, book_a)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .bind(book_a)
        .fetch_one(&mut *tx)
        .await?;

        for book_id in books_b {
            sqlx::query(
                "INSERT INTO exchange_offer_books (offer_id, book_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(offer_id)
            .bind(book_id)
            .execute(&mut *tx)
            .await?;
        }

        let offer =
            sqlx::query_as::<_, ExchangeOffer>(&format!("{} WHERE o.id = $1", SELECT_OFFER))
                .bind(offer_id)
                .fetch_one(&mut *tx)
                .await?;

        tx.commit().await?;
        Ok(offer)
    }

    /// The target picks a candidate book
    pub async fn choose_book(
        &self,
        offer_id: i32,
        actor: i32,
        book_id: i32,
    ) -> AppResult<ExchangeOffer> {
        self.transition(offer_id, |offer| offer.choose_book(actor, book_id))
            .await
    }

    /// The initiator ratifies the choice
    pub async fn confirm(&self, offer_id: i32, actor: i32) -> AppResult<ExchangeOffer> {
        self.transition(offer_id, |offer| offer.confirm(actor)).await
    }

    /// Either party backs out
    pub async fn reject(&self, offer_id: i32, actor: i32) -> AppResult<ExchangeOffer> {
        self.transition(offer_id, |offer| offer.reject(actor)).await
    }

    /// Apply a state-machine transition under a row lock. The offer is
    /// re-read FOR UPDATE inside the transaction, the pure transition
    /// re-checks its preconditions against that fresh state, and the flag
    /// fields are written back before commit. All-or-nothing.
    async fn transition<F>(&self, offer_id: i32, apply: F) -> AppResult<ExchangeOffer>
    where
        F: FnOnce(&mut ExchangeOffer) -> AppResult<()>,
    {
        let mut tx = self.pool.begin().await?;

        let mut offer = Self::fetch_locked(&mut tx, offer_id).await?;
        apply(&mut offer)?;

        sqlx::query(
            r#"
            UPDATE exchange_offers SET
                chosen_book_b = $1,
                accepted_a = $2,
                accepted_b = $3,
                rejected = $4
            WHERE id = $5
            "#,
        )
        .bind(offer.chosen_book_b)
        .bind(offer.accepted_a)
        .bind(offer.accepted_b)
        .bind(offer.rejected)
        .bind(offer_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(offer)
    }

    async fn fetch_locked(
        tx: &mut Transaction<'_, Postgres>,
        offer_id: i32,
    ) -> AppResult<ExchangeOffer> {
        sqlx::query_as::<_, ExchangeOffer>(&format!(
            "{} WHERE o.id = $1 FOR UPDATE OF o",
            SELECT_OFFER
        ))
        .bind(offer_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("Exchange offer with id {} not found", offer_id))
        })
    }
}
