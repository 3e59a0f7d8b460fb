//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, books, catalog, exchanges, feed, health, library, listings, messages, reviews, users,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookmarket API",
        version = "1.0.0",
        description = "Book cataloguing and exchange marketplace REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::me,
        auth::update_profile,
        // Users
        users::list_users,
        users::get_user,
        users::create_follow,
        users::list_follows,
        users::delete_follow,
        // Catalog
        catalog::list_authors,
        catalog::get_author,
        catalog::create_author,
        catalog::update_author,
        catalog::delete_author,
        catalog::list_genres,
        catalog::create_genre,
        catalog::delete_genre,
        catalog::list_publishers,
        catalog::get_publisher,
        catalog::create_publisher,
        catalog::update_publisher,
        catalog::delete_publisher,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        // Reviews
        reviews::list_book_reviews,
        reviews::create_review,
        reviews::delete_review,
        // Listings
        listings::list_listings,
        listings::get_listing,
        listings::create_listing,
        listings::update_listing,
        listings::deactivate_listing,
        // Library and wishlist
        library::list_library,
        library::add_to_library,
        library::remove_from_library,
        library::list_wishlist,
        library::add_to_wishlist,
        library::remove_from_wishlist,
        // Messaging
        messages::list_conversations,
        messages::list_conversation_messages,
        messages::create_message,
        messages::mark_message_read,
        // Discovery feeds
        feed::list_rankings,
        feed::list_activities,
        // Exchanges
        exchanges::list_exchange_offers,
        exchanges::get_exchange_offer,
        exchanges::create_exchange_offer,
        exchanges::choose_exchange_book,
        exchanges::confirm_exchange_offer,
        exchanges::reject_exchange_offer,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Users
            crate::models::user::UserSummary,
            crate::models::user::UserProfile,
            crate::models::user::RegisterUser,
            crate::models::user::UpdateProfile,
            crate::models::user::Follow,
            crate::models::user::CreateFollow,
            // Catalog
            crate::models::catalog::Author,
            crate::models::catalog::CreateAuthor,
            crate::models::catalog::UpdateAuthor,
            crate::models::catalog::Genre,
            crate::models::catalog::CreateGenre,
            crate::models::catalog::Publisher,
            crate::models::catalog::CreatePublisher,
            crate::models::catalog::UpdatePublisher,
            // Books
            crate::models::book::EditionType,
            crate::models::book::BookDetails,
            crate::models::book::BookSummary,
            crate::models::book::CreateBook,
            crate::models::book::UpdateBook,
            books::BookListResponse,
            // Reviews
            crate::models::review::ReviewDetails,
            crate::models::review::CreateReview,
            // Listings
            crate::models::listing::ListingType,
            crate::models::listing::Condition,
            crate::models::listing::ListingDetails,
            crate::models::listing::CreateListing,
            crate::models::listing::UpdateListing,
            // Library and wishlist
            crate::models::library::ShelfEntryDetails,
            crate::models::library::AddShelfEntry,
            // Messaging
            crate::models::conversation::MessageAttachment,
            crate::models::conversation::Message,
            crate::models::conversation::ConversationDetails,
            crate::models::conversation::CreateMessage,
            // Discovery feeds
            crate::models::feed::BookRankingDetails,
            crate::models::feed::ActivityDetails,
            // Exchanges
            crate::models::exchange::ExchangeState,
            crate::models::exchange::ExchangeOfferDetails,
            crate::models::exchange::CreateExchangeOffer,
            crate::models::exchange::ChooseBook,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication and profile"),
        (name = "users", description = "Users and follows"),
        (name = "catalog", description = "Authors, genres and publishers"),
        (name = "books", description = "Book catalog"),
        (name = "reviews", description = "Reviews and ratings"),
        (name = "listings", description = "Sale and exchange listings"),
        (name = "library", description = "Personal library and wishlist"),
        (name = "messages", description = "Conversations and messages"),
        (name = "feed", description = "Book rankings and activity feed"),
        (name = "exchanges", description = "Exchange offer negotiation")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
