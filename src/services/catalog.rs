//! Catalog management service (books, authors, genres, publishers)

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookSummary, CreateBook, UpdateBook, ISBN_RE},
        catalog::{
            Author, CreateAuthor, CreateGenre, CreatePublisher, Genre, Publisher, UpdateAuthor,
            UpdatePublisher,
        },
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // -----------------------------------------------------------------------
    // Books
    // -----------------------------------------------------------------------

    /// List books, paginated, as compact summaries with the total count
    pub async fn list_books(&self, limit: i64, offset: i64) -> AppResult<(Vec<BookSummary>, i64)> {
        let (books, total) = self
            .repository
            .books
            .list(limit.clamp(1, 200), offset.max(0))
            .await?;

        let summaries = books
            .into_iter()
            .map(|b| BookSummary {
                id: b.id,
                title: b.title,
                cover_url: b.cover_url,
                average_rating: b.average_rating,
            })
            .collect();
        Ok((summaries, total))
    }

    /// Get a book with its relations
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetails> {
        let book = self.repository.books.get_by_id(id).await?;
        self.repository.books.details(book).await
    }

    /// Create a book; ISBN must be well formed and unique across the catalog
    pub async fn create_book(&self, book: CreateBook, added_by: i32) -> AppResult<BookDetails> {
        if !ISBN_RE.is_match(&book.isbn) {
            return Err(AppError::Validation(
                "ISBN must be 10 or 13 digits without separators".to_string(),
            ));
        }
        if self.repository.books.isbn_exists(&book.isbn).await? {
            return Err(AppError::Conflict(
                "A book with this ISBN already exists".to_string(),
            ));
        }

        for author_id in &book.author_ids {
            self.repository.catalog.authors_get_by_id(*author_id).await?;
        }
        for genre_id in &book.genre_ids {
            self.repository.catalog.genres_get_by_id(*genre_id).await?;
        }
        if let Some(publisher_id) = book.publisher_id {
            self.repository.catalog.publishers_get_by_id(publisher_id).await?;
        }

        let created = self.repository.books.create(&book, added_by).await?;
        self.repository.books.details(created).await
    }

    /// Update a book
    pub async fn update_book(&self, id: i32, book: UpdateBook) -> AppResult<BookDetails> {
        let updated: Book = self.repository.books.update(id, &book).await?;
        self.repository.books.details(updated).await
    }

    /// Delete a book and its dependent rows (cascade)
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.delete(id).await
    }

    // -----------------------------------------------------------------------
    // Authors
    // -----------------------------------------------------------------------

    pub async fn list_authors(&self) -> AppResult<Vec<Author>> {
        self.repository.catalog.authors_list().await
    }

    pub async fn get_author(&self, id: i32) -> AppResult<Author> {
        self.repository.catalog.authors_get_by_id(id).await
    }

    /// Create an author; the (first name, last name) pair must be unique
    pub async fn create_author(&self, author: CreateAuthor) -> AppResult<Author> {
        if let Some(existing) = self
            .repository
            .catalog
            .authors_find_by_name(author.first_name.trim(), author.last_name.trim())
            .await?
        {
            return Err(AppError::Conflict(format!(
                "Author already exists with id {}",
                existing.id
            )));
        }
        self.repository.catalog.authors_create(&author).await
    }

    pub async fn update_author(&self, id: i32, author: UpdateAuthor) -> AppResult<Author> {
        self.repository.catalog.authors_update(id, &author).await
    }

    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.catalog.authors_delete(id).await
    }

    // -----------------------------------------------------------------------
    // Genres
    // -----------------------------------------------------------------------

    pub async fn list_genres(&self) -> AppResult<Vec<Genre>> {
        self.repository.catalog.genres_list().await
    }

    pub async fn create_genre(&self, genre: CreateGenre) -> AppResult<Genre> {
        if self.repository.catalog.genres_name_exists(genre.name.trim()).await? {
            return Err(AppError::Conflict("Genre already exists".to_string()));
        }
        self.repository.catalog.genres_create(&genre).await
    }

    pub async fn delete_genre(&self, id: i32) -> AppResult<()> {
        self.repository.catalog.genres_delete(id).await
    }

    // -----------------------------------------------------------------------
    // Publishers
    // -----------------------------------------------------------------------

    pub async fn list_publishers(&self) -> AppResult<Vec<Publisher>> {
        self.repository.catalog.publishers_list().await
    }

    pub async fn get_publisher(&self, id: i32) -> AppResult<Publisher> {
        self.repository.catalog.publishers_get_by_id(id).await
    }

    pub async fn create_publisher(&self, publisher: CreatePublisher) -> AppResult<Publisher> {
        if self
            .repository
            .catalog
            .publishers_name_exists(publisher.name.trim())
            .await?
        {
            return Err(AppError::Conflict("Publisher already exists".to_string()));
        }
        self.repository.catalog.publishers_create(&publisher).await
    }

    pub async fn update_publisher(
        &self,
        id: i32,
        publisher: UpdatePublisher,
    ) -> AppResult<Publisher> {
        self.repository.catalog.publishers_update(id, &publisher).await
    }

    pub async fn delete_publisher(&self, id: i32) -> AppResult<()> {
        self.repository.catalog.publishers_delete(id).await
    }
}
