//! Business logic services

pub mod bridge;
pub mod catalog;
pub mod exchanges;
pub mod feed;
pub mod library;
pub mod listings;
pub mod messaging;
pub mod ratings;
pub mod reviews;
pub mod users;

use crate::{config::AuthConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub reviews: reviews::ReviewsService,
    pub listings: listings::ListingsService,
    pub library: library::LibraryService,
    pub messaging: messaging::MessagingService,
    pub exchanges: exchanges::ExchangesService,
    pub feed: feed::FeedService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        let messaging = messaging::MessagingService::new(repository.clone());
        let bridge = bridge::MessagingBridge::new(repository.clone(), messaging.clone());

        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone()),
            reviews: reviews::ReviewsService::new(repository.clone()),
            listings: listings::ListingsService::new(repository.clone()),
            library: library::LibraryService::new(repository.clone()),
            feed: feed::FeedService::new(repository.clone()),
            exchanges: exchanges::ExchangesService::new(repository, bridge),
            messaging,
        }
    }
}
