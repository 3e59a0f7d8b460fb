//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookDetails, BookSummary, CreateBook, UpdateBook},
        catalog::{Author, Genre, Publisher},
        user::UserSummary,
    },
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book row by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Check whether all given book ids exist
    pub async fn all_exist(&self, ids: &[i32]) -> AppResult<bool> {
        let found: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT id) FROM books WHERE id = ANY($1)")
                .bind(ids)
                .fetch_one(&self.pool)
                .await?;
        let distinct = {
            let mut sorted = ids.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            sorted.len() as i64
        };
        Ok(found == distinct)
    }

    pub async fn isbn_exists(&self, isbn: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1)")
            .bind(isbn)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Create a book with its author and genre links in one transaction
    pub async fn create(&self, book: &CreateBook, added_by: i32) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (
                title, description, pages, isbn, publisher_id,
                published_year, edition_type, cover_url, added_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.pages)
        .bind(&book.isbn)
        .bind(book.publisher_id)
        .bind(book.published_year)
        .bind(book.edition_type)
        .bind(&book.cover_url)
        .bind(added_by)
        .fetch_one(&mut *tx)
        .await?;

        for author_id in &book.author_ids {
            sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                .bind(created.id)
                .bind(author_id)
                .execute(&mut *tx)
                .await?;
        }
        for genre_id in &book.genre_ids {
            sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                .bind(created.id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(created)
    }

    /// Update book fields; author/genre links are replaced when provided
    pub async fn update(&self, id: i32, book: &UpdateBook) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books SET
                title = COALESCE($1, title),
                description = COALESCE($2, description),
                pages = COALESCE($3, pages),
                publisher_id = COALESCE($4, publisher_id),
                published_year = COALESCE($5, published_year),
                edition_type = COALESCE($6, edition_type),
                cover_url = COALESCE($7, cover_url)
            WHERE id = $8
            RETURNING *
            "#,
        )
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.pages)
        .bind(book.publisher_id)
        .bind(book.published_year)
        .bind(book.edition_type)
        .bind(&book.cover_url)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))?;

        if let Some(ref author_ids) = book.author_ids {
            sqlx::query("DELETE FROM book_authors WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for author_id in author_ids {
                sqlx::query("INSERT INTO book_authors (book_id, author_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(author_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
        if let Some(ref genre_ids) = book.genre_ids {
            sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await?;
            for genre_id in genre_ids {
                sqlx::query("INSERT INTO book_genres (book_id, genre_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(genre_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book with id {} not found", id)));
        }
        Ok(())
    }

    /// List books, paginated, with total count
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<(Vec<Book>, i64)> {
        let books =
            sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title LIMIT $1 OFFSET $2")
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;

        Ok((books, total))
    }

    /// Assemble a book with its authors, genres, publisher and contributor
    pub async fn details(&self, book: Book) -> AppResult<BookDetails> {
        let authors = sqlx::query_as::<_, Author>(
            r#"
            SELECT a.* FROM authors a
            JOIN book_authors ba ON ba.author_id = a.id
            WHERE ba.book_id = $1
            ORDER BY a.last_name, a.first_name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        let genres = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.* FROM genres g
            JOIN book_genres bg ON bg.genre_id = g.id
            WHERE bg.book_id = $1
            ORDER BY g.name
            "#,
        )
        .bind(book.id)
        .fetch_all(&self.pool)
        .await?;

        let publisher = match book.publisher_id {
            Some(publisher_id) => {
                sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
                    .bind(publisher_id)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => None,
        };

        let added_by = match book.added_by {
            Some(user_id) => sqlx::query_as::<_, UserSummary>(
                "SELECT id, username, avatar_url FROM users WHERE id = $1",
            )
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?,
            None => None,
        };

        Ok(BookDetails {
            id: book.id,
            title: book.title,
            authors,
            genres,
            description: book.description,
            pages: book.pages,
            isbn: book.isbn,
            publisher,
            published_year: book.published_year,
            edition_type: book.edition_type,
            cover_url: book.cover_url,
            added_by,
            average_rating: book.average_rating,
            created_at: book.created_at,
        })
    }

    /// Compact summaries for a set of book ids, in no particular order
    pub async fn summaries(&self, ids: &[i32]) -> AppResult<Vec<BookSummary>> {
        let books = sqlx::query_as::<_, BookSummary>(
            "SELECT id, title, cover_url, average_rating FROM books WHERE id = ANY($1)",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    /// Write only the cached average rating of a book
    pub async fn set_average_rating(&self, book_id: i32, average_rating: f64) -> AppResult<()> {
        sqlx::query("UPDATE books SET average_rating = $1 WHERE id = $2")
            .bind(average_rating)
            .bind(book_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
