//! Bookmarket Server - Book cataloguing and exchange marketplace
//!
//! A Rust REST API server for a community book marketplace.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bookmarket_server::{api, config::AppConfig, repository::Repository, services::Services, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("bookmarket_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Bookmarket Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(repository, config.auth.clone());

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        .route("/auth/profile", put(api::auth::update_profile))
        // Users and follows
        .route("/users", get(api::users::list_users))
        .route("/users/:id", get(api::users::get_user))
        .route("/follows", post(api::users::create_follow))
        .route("/follows", get(api::users::list_follows))
        .route("/follows/:id", delete(api::users::delete_follow))
        // Catalog
        .route("/authors", get(api::catalog::list_authors))
        .route("/authors", post(api::catalog::create_author))
        .route("/authors/:id", get(api::catalog::get_author))
        .route("/authors/:id", put(api::catalog::update_author))
        .route("/authors/:id", delete(api::catalog::delete_author))
        .route("/genres", get(api::catalog::list_genres))
        .route("/genres", post(api::catalog::create_genre))
        .route("/genres/:id", delete(api::catalog::delete_genre))
        .route("/publishers", get(api::catalog::list_publishers))
        .route("/publishers", post(api::catalog::create_publisher))
        .route("/publishers/:id", get(api::catalog::get_publisher))
        .route("/publishers/:id", put(api::catalog::update_publisher))
        .route("/publishers/:id", delete(api::catalog::delete_publisher))
        // Books
        .route("/books", get(api::books::list_books))
        .route("/books", post(api::books::create_book))
        .route("/books/:id", get(api::books::get_book))
        .route("/books/:id", put(api::books::update_book))
        .route("/books/:id", delete(api::books::delete_book))
        // Reviews
        .route("/books/:id/reviews", get(api::reviews::list_book_reviews))
        .route("/reviews", post(api::reviews::create_review))
        .route("/reviews/:id", delete(api::reviews::delete_review))
        // Listings
        .route("/listings", get(api::listings::list_listings))
        .route("/listings", post(api::listings::create_listing))
        .route("/listings/:id", get(api::listings::get_listing))
        .route("/listings/:id", put(api::listings::update_listing))
        .route(
            "/listings/:id/deactivate",
            post(api::listings::deactivate_listing),
        )
        // Library and wishlist
        .route("/library", get(api::library::list_library))
        .route("/library", post(api::library::add_to_library))
        .route("/library/:id", delete(api::library::remove_from_library))
        .route("/wishlist", get(api::library::list_wishlist))
        .route("/wishlist", post(api::library::add_to_wishlist))
        .route("/wishlist/:id", delete(api::library::remove_from_wishlist))
        // Messaging
        .route("/conversations", get(api::messages::list_conversations))
        .route(
            "/conversations/:id/messages",
            get(api::messages::list_conversation_messages),
        )
        .route("/messages", post(api::messages::create_message))
        .route("/messages/:id/read", post(api::messages::mark_message_read))
        // Discovery feeds
        .route("/rankings", get(api::feed::list_rankings))
        .route("/activities", get(api::feed::list_activities))
        // Exchange offers
        .route("/exchange-offers", get(api::exchanges::list_exchange_offers))
        .route("/exchange-offers", post(api::exchanges::create_exchange_offer))
        .route("/exchange-offers/:id", get(api::exchanges::get_exchange_offer))
        .route(
            "/exchange-offers/:id/choose",
            post(api::exchanges::choose_exchange_book),
        )
        .route(
            "/exchange-offers/:id/confirm",
            post(api::exchanges::confirm_exchange_offer),
        )
        .route(
            "/exchange-offers/:id/reject",
            post(api::exchanges::reject_exchange_offer),
        )
        .with_state(state.clone());

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
