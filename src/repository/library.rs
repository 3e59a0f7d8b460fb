//! Personal library and wishlist repository
//!
//! Both shelves share the same shape; `Shelf` selects the backing table.

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::library::ShelfEntry,
};

/// Which per-user book shelf to operate on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shelf {
    Library,
    Wishlist,
}

impl Shelf {
    fn table(self) -> &'static str {
        match self {
            Shelf::Library => "user_library",
            Shelf::Wishlist => "wishlists",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Shelf::Library => "library",
            Shelf::Wishlist => "wishlist",
        }
    }
}

#[derive(Clone)]
pub struct LibraryRepository {
    pool: Pool<Postgres>,
}

impl LibraryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Entries of a user's shelf, newest first
    pub async fn list(&self, shelf: Shelf, user_id: i32) -> AppResult<Vec<ShelfEntry>> {
        let entries = sqlx::query_as::<_, ShelfEntry>(&format!(
            "SELECT * FROM {} WHERE user_id = $1 ORDER BY added_at DESC",
            shelf.table()
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(entries)
    }

    /// Add a book to a user's shelf; at most one entry per (user, book)
    pub async fn add(&self, shelf: Shelf, user_id: i32, book_id: i32) -> AppResult<ShelfEntry> {
        let entry = sqlx::query_as::<_, ShelfEntry>(&format!(
            "INSERT INTO {} (user_id, book_id) VALUES ($1, $2) RETURNING *",
            shelf.table()
        ))
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(format!(
                "Book is already in the user's {}",
                shelf.label()
            )),
            _ => AppError::from(e),
        })?;

        Ok(entry)
    }

    /// Remove an entry owned by the user
    pub async fn remove(&self, shelf: Shelf, id: i32, user_id: i32) -> AppResult<()> {
        let result = sqlx::query(&format!(
            "DELETE FROM {} WHERE id = $1 AND user_id = $2",
            shelf.table()
        ))
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "No {} entry with id {}",
                shelf.label(),
                id
            )));
        }
        Ok(())
    }

    /// Whether the user's library contains the book
    pub async fn contains(&self, shelf: Shelf, user_id: i32, book_id: i32) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE user_id = $1 AND book_id = $2)",
            shelf.table()
        ))
        .bind(user_id)
        .bind(book_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }
}
