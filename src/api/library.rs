//! Personal library and wishlist endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::library::{AddShelfEntry, ShelfEntryDetails},
    repository::library::Shelf,
};

use super::AuthenticatedUser;

/// Own library entries
#[utoipa::path(
    get,
    path = "/library",
    tag = "library",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Library entries", body = Vec<ShelfEntryDetails>))
)]
pub async fn list_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ShelfEntryDetails>>> {
    Ok(Json(
        state.services.library.list(Shelf::Library, claims.user_id).await?,
    ))
}

/// Add a book to own library
#[utoipa::path(
    post,
    path = "/library",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = AddShelfEntry,
    responses(
        (status = 201, description = "Book added", body = ShelfEntryDetails),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already in library")
    )
)]
pub async fn add_to_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<AddShelfEntry>,
) -> AppResult<(StatusCode, Json<ShelfEntryDetails>)> {
    let entry = state
        .services
        .library
        .add(Shelf::Library, claims.user_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove a book from own library
#[utoipa::path(
    delete,
    path = "/library/{id}",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Library entry ID")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn remove_from_library(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .services
        .library
        .remove(Shelf::Library, id, claims.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Own wishlist entries
#[utoipa::path(
    get,
    path = "/wishlist",
    tag = "library",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Wishlist entries", body = Vec<ShelfEntryDetails>))
)]
pub async fn list_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ShelfEntryDetails>>> {
    Ok(Json(
        state.services.library.list(Shelf::Wishlist, claims.user_id).await?,
    ))
}

/// Add a book to own wishlist
#[utoipa::path(
    post,
    path = "/wishlist",
    tag = "library",
    security(("bearer_auth" = [])),
    request_body = AddShelfEntry,
    responses(
        (status = 201, description = "Book added", body = ShelfEntryDetails),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book already in wishlist")
    )
)]
pub async fn add_to_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<AddShelfEntry>,
) -> AppResult<(StatusCode, Json<ShelfEntryDetails>)> {
    let entry = state
        .services
        .library
        .add(Shelf::Wishlist, claims.user_id, request.book_id)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove a book from own wishlist
#[utoipa::path(
    delete,
    path = "/wishlist/{id}",
    tag = "library",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Wishlist entry ID")),
    responses(
        (status = 204, description = "Entry removed"),
        (status = 404, description = "Entry not found")
    )
)]
pub async fn remove_from_wishlist(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state
        .services
        .library
        .remove(Shelf::Wishlist, id, claims.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
