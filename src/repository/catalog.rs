//! Authors, genres and publishers repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::catalog::{
        Author, CreateAuthor, CreateGenre, CreatePublisher, Genre, Publisher, UpdateAuthor,
        UpdatePublisher,
    },
};

#[derive(Clone)]
pub struct CatalogRepository {
    pool: Pool<Postgres>,
}

impl CatalogRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // -----------------------------------------------------------------------
    // Authors
    // -----------------------------------------------------------------------

    pub async fn authors_list(&self) -> AppResult<Vec<Author>> {
        let authors =
            sqlx::query_as::<_, Author>("SELECT * FROM authors ORDER BY last_name, first_name")
                .fetch_all(&self.pool)
                .await?;
        Ok(authors)
    }

    pub async fn authors_get_by_id(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))
    }

    /// Find an author by name pair, case insensitive
    pub async fn authors_find_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT * FROM authors WHERE lower(first_name) = lower($1) AND lower(last_name) = lower($2)",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(author)
    }

    pub async fn authors_create(&self, author: &CreateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (first_name, last_name, bio)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(author.first_name.trim())
        .bind(author.last_name.trim())
        .bind(&author.bio)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    pub async fn authors_update(&self, id: i32, author: &UpdateAuthor) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            UPDATE authors SET
                first_name = COALESCE($1, first_name),
                last_name = COALESCE($2, last_name),
                bio = COALESCE($3, bio)
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(&author.first_name)
        .bind(&author.last_name)
        .bind(&author.bio)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author with id {} not found", id)))?;
        Ok(author)
    }

    pub async fn authors_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author with id {} not found", id)));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Genres
    // -----------------------------------------------------------------------

    pub async fn genres_list(&self) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT * FROM genres ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    pub async fn genres_get_by_id(&self, id: i32) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT * FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre with id {} not found", id)))
    }

    pub async fn genres_name_exists(&self, name: &str) -> AppResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM genres WHERE lower(name) = lower($1))")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    pub async fn genres_create(&self, genre: &CreateGenre) -> AppResult<Genre> {
        let genre =
            sqlx::query_as::<_, Genre>("INSERT INTO genres (name) VALUES ($1) RETURNING *")
                .bind(genre.name.trim())
                .fetch_one(&self.pool)
                .await?;
        Ok(genre)
    }

    pub async fn genres_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Genre with id {} not found", id)));
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Publishers
    // -----------------------------------------------------------------------

    pub async fn publishers_list(&self) -> AppResult<Vec<Publisher>> {
        let publishers = sqlx::query_as::<_, Publisher>("SELECT * FROM publishers ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(publishers)
    }

    pub async fn publishers_get_by_id(&self, id: i32) -> AppResult<Publisher> {
        sqlx::query_as::<_, Publisher>("SELECT * FROM publishers WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Publisher with id {} not found", id)))
    }

    pub async fn publishers_name_exists(&self, name: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM publishers WHERE lower(name) = lower($1))",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn publishers_create(&self, publisher: &CreatePublisher) -> AppResult<Publisher> {
        let publisher = sqlx::query_as::<_, Publisher>(
            "INSERT INTO publishers (name, description) VALUES ($1, $2) RETURNING *",
        )
        .bind(publisher.name.trim())
        .bind(&publisher.description)
        .fetch_one(&self.pool)
        .await?;
        Ok(publisher)
    }

    pub async fn publishers_update(
        &self,
        id: i32,
        publisher: &UpdatePublisher,
    ) -> AppResult<Publisher> {
        let publisher = sqlx::query_as::<_, Publisher>(
            r#"
            UPDATE publishers SET
                name = COALESCE($1, name),
                description = COALESCE($2, description)
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(&publisher.name)
        .bind(&publisher.description)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Publisher with id {} not found", id)))?;
        Ok(publisher)
    }

    /// Delete a publisher; books referencing it fall back to NULL (FK SET NULL)
    pub async fn publishers_delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM publishers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Publisher with id {} not found", id)));
        }
        Ok(())
    }
}
