//! Personal library and wishlist service

use crate::{
    error::{AppError, AppResult},
    models::library::{ShelfEntry, ShelfEntryDetails},
    repository::{library::Shelf, Repository},
};

#[derive(Clone)]
pub struct LibraryService {
    repository: Repository,
}

impl LibraryService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Entries of the actor's shelf with embedded books
    pub async fn list(&self, shelf: Shelf, user_id: i32) -> AppResult<Vec<ShelfEntryDetails>> {
        let entries = self.repository.library.list(shelf, user_id).await?;
        let mut result = Vec::with_capacity(entries.len());
        for entry in entries {
            result.push(self.details(entry).await?);
        }
        Ok(result)
    }

    /// Add a book to the actor's shelf
    pub async fn add(
        &self,
        shelf: Shelf,
        user_id: i32,
        book_id: i32,
    ) -> AppResult<ShelfEntryDetails> {
        // Verify book exists
        self.repository.books.get_by_id(book_id).await?;

        let entry = self.repository.library.add(shelf, user_id, book_id).await?;
        self.details(entry).await
    }

    /// Remove an own shelf entry
    pub async fn remove(&self, shelf: Shelf, id: i32, user_id: i32) -> AppResult<()> {
        self.repository.library.remove(shelf, id, user_id).await
    }

    async fn details(&self, entry: ShelfEntry) -> AppResult<ShelfEntryDetails> {
        let books = self.repository.books.summaries(&[entry.book_id]).await?;
        let book = books
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Internal("Shelved book missing".to_string()))?;

        Ok(ShelfEntryDetails {
            id: entry.id,
            book,
            added_at: entry.added_at,
        })
    }
}
