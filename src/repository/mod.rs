//! Repository layer for database operations

pub mod books;
pub mod catalog;
pub mod conversations;
pub mod exchanges;
pub mod feed;
pub mod library;
pub mod listings;
pub mod reviews;
pub mod users;

use sqlx::{Pool, Postgres};

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub users: users::UsersRepository,
    pub catalog: catalog::CatalogRepository,
    pub books: books::BooksRepository,
    pub reviews: reviews::ReviewsRepository,
    pub listings: listings::ListingsRepository,
    pub library: library::LibraryRepository,
    pub conversations: conversations::ConversationsRepository,
    pub exchanges: exchanges::ExchangesRepository,
    pub feed: feed::FeedRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: users::UsersRepository::new(pool.clone()),
            catalog: catalog::CatalogRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            reviews: reviews::ReviewsRepository::new(pool.clone()),
            listings: listings::ListingsRepository::new(pool.clone()),
            library: library::LibraryRepository::new(pool.clone()),
            conversations: conversations::ConversationsRepository::new(pool.clone()),
            exchanges: exchanges::ExchangesRepository::new(pool.clone()),
            feed: feed::FeedRepository::new(pool.clone()),
            pool,
        }
    }
}
