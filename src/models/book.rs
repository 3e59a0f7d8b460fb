//! Book model and related types

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::catalog::{Author, Genre, Publisher};
use super::user::UserSummary;

/// ISBN-10 or ISBN-13, digits only with an optional trailing check X
pub static ISBN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:\d{9}[\dX]|\d{13})$").expect("invalid ISBN regex"));

/// Physical or digital edition of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "edition_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EditionType {
    Hardcover,
    Paperback,
    Album,
    AudioCd,
    AudioOnline,
    EbookPdf,
    EbookEpub,
}

impl std::fmt::Display for EditionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            EditionType::Hardcover => "hardcover",
            EditionType::Paperback => "paperback",
            EditionType::Album => "album",
            EditionType::AudioCd => "audio_cd",
            EditionType::AudioOnline => "audio_online",
            EditionType::EbookPdf => "ebook_pdf",
            EditionType::EbookEpub => "ebook_epub",
        };
        write!(f, "{}", label)
    }
}

/// Book row from database
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub pages: Option<i32>,
    pub isbn: String,
    pub publisher_id: Option<i32>,
    pub published_year: Option<i32>,
    pub edition_type: EditionType,
    pub cover_url: Option<String>,
    pub added_by: Option<i32>,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Book with embedded relations for display
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetails {
    pub id: i32,
    pub title: String,
    pub authors: Vec<Author>,
    pub genres: Vec<Genre>,
    pub description: Option<String>,
    pub pages: Option<i32>,
    pub isbn: String,
    pub publisher: Option<Publisher>,
    pub published_year: Option<i32>,
    pub edition_type: EditionType,
    pub cover_url: Option<String>,
    pub added_by: Option<UserSummary>,
    pub average_rating: f64,
    pub created_at: DateTime<Utc>,
}

/// Compact book representation embedded in listings, offers and messages
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: i32,
    pub title: String,
    pub cover_url: Option<String>,
    pub average_rating: f64,
}

/// Create book request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub author_ids: Vec<i32>,
    pub genre_ids: Vec<i32>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub pages: Option<i32>,
    pub isbn: String,
    pub publisher_id: Option<i32>,
    pub published_year: Option<i32>,
    pub edition_type: EditionType,
    pub cover_url: Option<String>,
}

/// Update book request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBook {
    pub title: Option<String>,
    pub author_ids: Option<Vec<i32>>,
    pub genre_ids: Option<Vec<i32>>,
    pub description: Option<String>,
    pub pages: Option<i32>,
    pub publisher_id: Option<i32>,
    pub published_year: Option<i32>,
    pub edition_type: Option<EditionType>,
    pub cover_url: Option<String>,
}

/// Paginated book list query
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct BookQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_regex_accepts_isbn13() {
        assert!(ISBN_RE.is_match("9788375780635"));
    }

    #[test]
    fn test_isbn_regex_accepts_isbn10_with_check_x() {
        assert!(ISBN_RE.is_match("837578063X"));
    }

    #[test]
    fn test_isbn_regex_rejects_separators_and_bad_lengths() {
        assert!(!ISBN_RE.is_match("978-83-7578-063-5"));
        assert!(!ISBN_RE.is_match("12345"));
        assert!(!ISBN_RE.is_match(""));
    }
}
