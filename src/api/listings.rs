//! Listing endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::listing::{CreateListing, ListingDetails, ListingQuery, UpdateListing},
};

use super::AuthenticatedUser;

/// List active listings
#[utoipa::path(
    get,
    path = "/listings",
    tag = "listings",
    params(ListingQuery),
    responses(
        (status = 200, description = "Active listings", body = Vec<ListingDetails>)
    )
)]
pub async fn list_listings(
    State(state): State<crate::AppState>,
    Query(query): Query<ListingQuery>,
) -> AppResult<Json<Vec<ListingDetails>>> {
    Ok(Json(state.services.listings.list(&query).await?))
}

/// Get a listing
#[utoipa::path(
    get,
    path = "/listings/{id}",
    tag = "listings",
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing", body = ListingDetails),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn get_listing(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<ListingDetails>> {
    Ok(Json(state.services.listings.get(id).await?))
}

/// Create a listing
#[utoipa::path(
    post,
    path = "/listings",
    tag = "listings",
    security(("bearer_auth" = [])),
    request_body = CreateListing,
    responses(
        (status = 201, description = "Listing created", body = ListingDetails),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateListing>,
) -> AppResult<(StatusCode, Json<ListingDetails>)> {
    request.validate()?;
    let listing = state
        .services
        .listings
        .create(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// Update an own listing
#[utoipa::path(
    put,
    path = "/listings/{id}",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    request_body = UpdateListing,
    responses(
        (status = 200, description = "Listing updated", body = ListingDetails),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn update_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<UpdateListing>,
) -> AppResult<Json<ListingDetails>> {
    let listing = state
        .services
        .listings
        .update(id, claims.user_id, request)
        .await?;
    Ok(Json(listing))
}

/// Deactivate an own listing (soft removal)
#[utoipa::path(
    post,
    path = "/listings/{id}/deactivate",
    tag = "listings",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Listing ID")),
    responses(
        (status = 200, description = "Listing deactivated", body = ListingDetails),
        (status = 403, description = "Not the listing owner"),
        (status = 404, description = "Listing not found")
    )
)]
pub async fn deactivate_listing(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ListingDetails>> {
    let listing = state.services.listings.deactivate(id, claims.user_id).await?;
    Ok(Json(listing))
}
