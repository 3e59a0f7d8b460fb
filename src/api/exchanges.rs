//! Exchange offer endpoints
//!
//! The negotiation runs proposed -> chosen -> confirmed, with reject as the
//! terminal exit either party can take before confirmation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::AppResult,
    models::exchange::{ChooseBook, CreateExchangeOffer, ExchangeOfferDetails},
};

use super::AuthenticatedUser;

/// Offers the authenticated user participates in
#[utoipa::path(
    get,
    path = "/exchange-offers",
    tag = "exchanges",
    security(("bearer_auth" = [])),
    responses((status = 200, description = "Exchange offers", body = Vec<ExchangeOfferDetails>))
)]
pub async fn list_exchange_offers(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<ExchangeOfferDetails>>> {
    Ok(Json(state.services.exchanges.list_offers(claims.user_id).await?))
}

/// Get an exchange offer (parties only)
#[utoipa::path(
    get,
    path = "/exchange-offers/{id}",
    tag = "exchanges",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Exchange offer ID")),
    responses(
        (status = 200, description = "Exchange offer", body = ExchangeOfferDetails),
        (status = 403, description = "Not a party of this offer"),
        (status = 404, description = "Offer not found")
    )
)]
pub async fn get_exchange_offer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ExchangeOfferDetails>> {
    Ok(Json(state.services.exchanges.get_offer(id, claims.user_id).await?))
}

/// Propose an exchange. The authenticated user is the initiator offering
/// candidate books for a book the target owns or lists. A system message
/// announcing the offer is posted in the parties' conversation.
#[utoipa::path(
    post,
    path = "/exchange-offers",
    tag = "exchanges",
    security(("bearer_auth" = [])),
    request_body = CreateExchangeOffer,
    responses(
        (status = 201, description = "Offer created", body = ExchangeOfferDetails),
        (status = 400, description = "Invalid offer"),
        (status = 404, description = "Target user or book not found")
    )
)]
pub async fn create_exchange_offer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateExchangeOffer>,
) -> AppResult<(StatusCode, Json<ExchangeOfferDetails>)> {
    request.validate()?;
    let offer = state
        .services
        .exchanges
        .create_offer(claims.user_id, request)
        .await?;
    Ok((StatusCode::CREATED, Json(offer)))
}

/// The target picks one of the candidate books
#[utoipa::path(
    post,
    path = "/exchange-offers/{id}/choose",
    tag = "exchanges",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Exchange offer ID")),
    request_body = ChooseBook,
    responses(
        (status = 200, description = "Book chosen", body = ExchangeOfferDetails),
        (status = 403, description = "Only the target may choose"),
        (status = 404, description = "Offer not found"),
        (status = 422, description = "Offer is rejected or already confirmed")
    )
)]
pub async fn choose_exchange_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(request): Json<ChooseBook>,
) -> AppResult<Json<ExchangeOfferDetails>> {
    let offer = state
        .services
        .exchanges
        .choose_book(id, claims.user_id, request.book_id)
        .await?;
    Ok(Json(offer))
}

/// The initiator confirms the target's choice, sealing the exchange
#[utoipa::path(
    post,
    path = "/exchange-offers/{id}/confirm",
    tag = "exchanges",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Exchange offer ID")),
    responses(
        (status = 200, description = "Exchange confirmed", body = ExchangeOfferDetails),
        (status = 403, description = "Only the initiator may confirm"),
        (status = 404, description = "Offer not found"),
        (status = 422, description = "No book chosen yet, or offer rejected")
    )
)]
pub async fn confirm_exchange_offer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ExchangeOfferDetails>> {
    Ok(Json(state.services.exchanges.confirm(id, claims.user_id).await?))
}

/// Either party rejects the offer. Rejecting an already rejected offer is a
/// no-op; a confirmed offer can no longer be rejected.
#[utoipa::path(
    post,
    path = "/exchange-offers/{id}/reject",
    tag = "exchanges",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Exchange offer ID")),
    responses(
        (status = 200, description = "Offer rejected", body = ExchangeOfferDetails),
        (status = 403, description = "Not a party of this offer"),
        (status = 404, description = "Offer not found"),
        (status = 422, description = "Offer is already confirmed")
    )
)]
pub async fn reject_exchange_offer(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<ExchangeOfferDetails>> {
    Ok(Json(state.services.exchanges.reject(id, claims.user_id).await?))
}
