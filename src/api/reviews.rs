//! Review endpoints
//!
//! Creating or deleting a review recomputes the book's cached average rating
//! synchronously within the request.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::review::{CreateReview, ReviewDetails},
};

use super::AuthenticatedUser;

/// Reviews of a book
#[utoipa::path(
    get,
    path = "/books/{id}/reviews",
    tag = "reviews",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Reviews", body = Vec<ReviewDetails>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_reviews(
    State(state): State<crate::AppState>,
    Path(book_id): Path<i32>,
) -> AppResult<Json<Vec<ReviewDetails>>> {
    Ok(Json(state.services.reviews.for_book(book_id).await?))
}

/// Create a review
#[utoipa::path(
    post,
    path = "/reviews",
    tag = "reviews",
    security(("bearer_auth" = [])),
    request_body = CreateReview,
    responses(
        (status = 201, description = "Review created", body = ReviewDetails),
        (status = 400, description = "Invalid rating"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "User has already reviewed this book")
    )
)]
pub async fn create_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateReview>,
) -> AppResult<(StatusCode, Json<ReviewDetails>)> {
    request.validate()?;
    let review = state
        .services
        .reviews
        .create(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Delete own review
#[utoipa::path(
    delete,
    path = "/reviews/{id}",
    tag = "reviews",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not the review author"),
        (status = 404, description = "Review not found")
    )
)]
pub async fn delete_review(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.reviews.delete(id, claims.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
